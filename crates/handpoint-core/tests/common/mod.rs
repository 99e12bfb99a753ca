#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Cursor, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

use handpoint_core::client::CompositingService;
use handpoint_core::config::UploadConfig;
use handpoint_core::controller::Controller;
use handpoint_core::error::{HandpointError, Result};
use handpoint_core::io::upload::{ImageOrigin, SelectedFile};
use handpoint_core::protocol::{ProcessRequest, ProcessResponse};
use handpoint_core::telemetry::{TelemetryEvent, TelemetrySink};
use image::{ImageFormat, Rgb, RgbImage};

/// Encode a solid-colour `width`x`height` image in the given format.
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).expect("encode test image");
    buf.into_inner()
}

pub fn png_file(width: u32, height: u32) -> SelectedFile {
    SelectedFile {
        name: Some("photo.png".into()),
        origin: ImageOrigin::Gallery,
        bytes: encoded_image(width, height, ImageFormat::Png),
    }
}

/// Canned server answer for [`FakeService`].
pub enum Scripted {
    Respond(ProcessResponse),
    /// Simulates a connection failure / timeout.
    Transport,
}

pub fn success(result: &str, next: u32) -> Scripted {
    Scripted::Respond(ProcessResponse::Success {
        result: result.to_string(),
        next_overlay_index: next,
    })
}

pub fn failure(error: &str) -> Scripted {
    Scripted::Respond(ProcessResponse::Failure {
        error: error.to_string(),
    })
}

/// In-memory compositing server that replays scripted answers.
#[derive(Default)]
pub struct FakeService {
    script: Mutex<VecDeque<Scripted>>,
    pub requests: Mutex<Vec<ProcessRequest>>,
    pub result_bytes: Vec<u8>,
    pub fetched: Mutex<Vec<String>>,
}

impl FakeService {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            result_bytes: b"JPEGDATA".to_vec(),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<ProcessRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompositingService for FakeService {
    fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Respond(r)) => Ok(r),
            Some(Scripted::Transport) | None => {
                Err(HandpointError::UnexpectedStatus { status: 502 })
            }
        }
    }

    fn fetch_result(&self, url: &str) -> Result<Vec<u8>> {
        self.fetched.lock().unwrap().push(url.to_string());
        Ok(self.result_bytes.clone())
    }
}

/// Telemetry sink that keeps every event for later assertions.
#[derive(Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn emit(&self, event: TelemetryEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn controller() -> (Controller, Arc<RecordingTelemetry>) {
    let telemetry = Arc::new(RecordingTelemetry::default());
    let controller = Controller::new(UploadConfig::default(), telemetry.clone());
    (controller, telemetry)
}

/// Controller with a `width`x`height` image already loaded.
pub fn loaded_controller(width: u32, height: u32) -> (Controller, Arc<RecordingTelemetry>) {
    let (mut controller, telemetry) = controller();
    controller
        .select_image(Some(png_file(width, height)))
        .expect("load test image");
    (controller, telemetry)
}

// ---------------------------------------------------------------------------
// Local HTTP server
// ---------------------------------------------------------------------------

/// One request as seen by [`StubServer`].
#[derive(Clone, Debug)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

/// Canned reply: status, content type, body.
pub type StubReply = (u16, &'static str, Vec<u8>);

/// Minimal HTTP/1.1 server on an ephemeral localhost port. Every connection
/// is answered by `respond` and then closed.
pub struct StubServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl StubServer {
    pub fn start<F>(respond: F) -> Self
    where
        F: Fn(&ReceivedRequest) -> StubReply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub address");
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = received.clone();

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let Ok(request) = read_request(&mut stream) else {
                    continue;
                };
                let (status, content_type, body) = respond(&request);
                log.lock().unwrap().push(request);

                let head = format!(
                    "HTTP/1.1 {status} {}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    if status < 400 { "OK" } else { "Error" },
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
                let _ = stream.flush();
            }
        });

        Self { addr, received }
    }

    /// Server that always gives the same reply.
    pub fn fixed(status: u16, content_type: &'static str, body: &str) -> Self {
        let body = body.as_bytes().to_vec();
        Self::start(move |_| (status, content_type, body.clone()))
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut TcpStream) -> std::io::Result<ReceivedRequest> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut line = String::new();
    reader.read_line(&mut line)?;
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body)?;

    Ok(ReceivedRequest {
        method,
        path,
        headers,
        body,
    })
}

/// An address nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{addr}")
}
