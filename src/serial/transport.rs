//! Trait abstraction for line-oriented transport operations to enable testing

use async_trait::async_trait;
use std::io;

/// Trait for reading newline-delimited telemetry records from the device
#[async_trait]
pub trait LineTransport: Send {
    /// Read one line from the device, bounded by the transport's timeout
    ///
    /// # Returns
    ///
    /// * `Ok(Some(line))` - A complete line, terminators stripped
    /// * `Ok(None)` - Timeout elapsed with no complete line; not an error
    /// * `Err(e)` - Transport failure; the session must be torn down
    async fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Trait for establishing transport sessions
///
/// The acquisition loop calls `connect` once per session attempt; each
/// failure keeps the loop in its retry path.
#[async_trait]
pub trait TransportFactory: Send {
    type Transport: LineTransport;

    /// Attempt to open a new transport session
    async fn connect(&mut self) -> crate::error::Result<Self::Transport>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::error::LoggerError;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// One scripted transport event
    #[derive(Debug, Clone)]
    pub enum Step {
        /// A complete line arrives
        Line(&'static str),
        /// The read times out with no data
        Timeout,
        /// The device disconnects mid-session
        Error(io::ErrorKind),
    }

    /// Mock transport that replays a fixed script
    ///
    /// Once the script is exhausted it idles, reporting timeouts, so tests
    /// exercising shutdown can interrupt an otherwise quiet session.
    pub struct MockTransport {
        script: VecDeque<Step>,
    }

    impl MockTransport {
        pub fn new(script: Vec<Step>) -> Self {
            Self { script: script.into() }
        }
    }

    #[async_trait]
    impl LineTransport for MockTransport {
        async fn read_line(&mut self) -> io::Result<Option<String>> {
            match self.script.pop_front() {
                Some(Step::Line(line)) => Ok(Some(line.to_string())),
                Some(Step::Timeout) | None => {
                    // Real timeouts take wall time; the pause keeps mock
                    // sessions from busy-spinning the test runtime
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Ok(None)
                }
                Some(Step::Error(kind)) => Err(io::Error::new(kind, "mock transport error")),
            }
        }
    }

    /// One scripted outcome of a connect attempt
    pub enum Connect {
        /// The port opens and the session replays the given script
        Ok(Vec<Step>),
        /// The port cannot be opened
        Fail,
    }

    /// Mock factory that replays a fixed sequence of connect outcomes
    ///
    /// Exhausting the sequence keeps failing, so the loop stays in its
    /// retry path until the test shuts it down.
    pub struct MockFactory {
        outcomes: VecDeque<Connect>,
        pub connect_attempts: usize,
    }

    impl MockFactory {
        pub fn new(outcomes: Vec<Connect>) -> Self {
            Self { outcomes: outcomes.into(), connect_attempts: 0 }
        }
    }

    #[async_trait]
    impl TransportFactory for MockFactory {
        type Transport = MockTransport;

        async fn connect(&mut self) -> crate::error::Result<MockTransport> {
            self.connect_attempts += 1;
            match self.outcomes.pop_front() {
                Some(Connect::Ok(script)) => Ok(MockTransport::new(script)),
                Some(Connect::Fail) | None => {
                    Err(LoggerError::Serial("mock port unavailable".to_string()))
                }
            }
        }
    }
}
