//! Shared test helpers: a scriptable transport stub and binary fixture
//! builders for the two wire formats.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;

use humboldt_fetch::{HttpResponse, Transport, TransportError};
use humboldt_types::{RawBar, RawTick};

type Handler = dyn Fn(&str, usize) -> Result<HttpResponse, TransportError> + Send + Sync;

/// A [`Transport`] that answers from a handler closure and records
/// every request it sees.
///
/// The handler receives the URL and the number of *prior* requests to
/// that same URL, so tests can script per-attempt behavior.
pub struct StubTransport {
    handler: Box<Handler>,
    log: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new(
        handler: impl Fn(&str, usize) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            log: Mutex::new(Vec::new()),
        })
    }

    /// Total requests seen.
    pub fn request_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    /// All requested URLs, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let prior = {
            let mut log = self.log.lock().unwrap();
            let prior = log.iter().filter(|seen| seen.as_str() == url).count();
            log.push(url.to_string());
            prior
        };
        (self.handler)(url, prior)
    }
}

/// A 200 response carrying the given body.
pub fn ok(body: Bytes) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse { status: 200, body })
}

/// An empty-bodied response with the given status.
pub fn status(status: u16) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status,
        body: Bytes::new(),
    })
}

/// LZMA-compresses a payload the way the remote serves bi5 bodies.
pub fn compress(payload: &[u8]) -> Bytes {
    let mut compressed = Vec::new();
    lzma_rs::lzma_compress(&mut Cursor::new(payload), &mut compressed).unwrap();
    compressed.into()
}

/// Encodes one 20-byte tick record.
pub fn tick_record(ms: u32, ask: i32, bid: i32, ask_vol: f32, bid_vol: f32) -> Vec<u8> {
    let mut bytes = vec![0u8; RawTick::SIZE];
    BigEndian::write_u32(&mut bytes[0..4], ms);
    BigEndian::write_i32(&mut bytes[4..8], ask);
    BigEndian::write_i32(&mut bytes[8..12], bid);
    BigEndian::write_f32(&mut bytes[12..16], ask_vol);
    BigEndian::write_f32(&mut bytes[16..20], bid_vol);
    bytes
}

/// Encodes one 24-byte bar record.
pub fn bar_record(delta_secs: i32, o: i32, h: i32, l: i32, c: i32, vol: f32) -> Vec<u8> {
    let mut bytes = vec![0u8; RawBar::SIZE];
    BigEndian::write_i32(&mut bytes[0..4], delta_secs);
    BigEndian::write_i32(&mut bytes[4..8], o);
    BigEndian::write_i32(&mut bytes[8..12], h);
    BigEndian::write_i32(&mut bytes[12..16], l);
    BigEndian::write_i32(&mut bytes[16..20], c);
    BigEndian::write_f32(&mut bytes[20..24], vol);
    bytes
}
