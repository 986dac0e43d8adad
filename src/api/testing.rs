/// Scripted stand-ins for the network and the clock.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use super::client::{Client, RawResponse, RetryPolicy, Sleeper, Transport, TransportError};

/// Replays a fixed script of outcomes and records every URL requested.
pub struct ScriptedTransport {
    script: RefCell<VecDeque<Result<RawResponse, TransportError>>>,
    pub seen: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<RawResponse, TransportError>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for &ScriptedTransport {
    fn get(&self, url: &Url) -> Result<RawResponse, TransportError> {
        self.seen.borrow_mut().push(url.to_string());
        self.script
            .borrow_mut()
            .pop_front()
            .expect("transport called more times than scripted")
    }
}

/// Records requested sleeps instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    pub slept: RefCell<Vec<Duration>>,
}

impl Sleeper for &RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

pub fn ok(body: &Value) -> Result<RawResponse, TransportError> {
    Ok(RawResponse {
        status: 200,
        retry_after: None,
        body: body.to_string(),
    })
}

pub fn status(code: u16, retry_after: Option<&str>) -> Result<RawResponse, TransportError> {
    Ok(RawResponse {
        status: code,
        retry_after: retry_after.map(str::to_owned),
        body: String::new(),
    })
}

pub fn client<'a>(
    t: &'a ScriptedTransport,
    s: &'a RecordingSleeper,
) -> Client<&'a ScriptedTransport, &'a RecordingSleeper> {
    Client::with_parts(
        Url::parse("https://www.moltbook.com/").expect("valid test URL"),
        t,
        s,
        RetryPolicy::default(),
    )
}
