//! Session-reuse policy for outbound TLS connections
//!
//! A session ticket installed on a stream whose handle was already torn down
//! is the race behind the transient faults the supervisor suppresses.
//! [`NoSessionReuse`] closes both doors: tickets are never applied to a dead
//! handle, and connect options never carry a ticket to begin with.

use crate::traits::{SessionPolicy, TlsStream, TlsTransport};

/// Options for an outbound TLS connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Remote host
    pub host: String,

    /// Remote port
    pub port: u16,

    /// SNI server name, if different from `host`
    pub server_name: Option<String>,

    /// Session ticket to resume
    pub session: Option<Vec<u8>>,
}

impl ConnectOptions {
    /// Options for `host:port` without a session
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }
}

/// Policy that disables session resumption
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSessionReuse;

impl SessionPolicy for NoSessionReuse {
    fn admit_session(&self, handle_open: bool, session: Option<&[u8]>) -> bool {
        handle_open && session.is_some()
    }

    fn prepare_connect(&self, options: &mut ConnectOptions) {
        options.session = None;
    }
}

/// A transport composed with a session policy
///
/// # Examples
///
/// ```
/// use crashguard_domain::session::{ConnectOptions, GuardedTransport};
/// use crashguard_domain::traits::{TlsStream, TlsTransport};
///
/// struct Stream;
/// impl TlsStream for Stream {
///     fn has_handle(&self) -> bool { false }
///     fn apply_session(&mut self, _session: &[u8]) { unreachable!() }
/// }
///
/// struct Transport;
/// impl TlsTransport for Transport {
///     type Stream = Stream;
///     type Error = ();
///     fn connect(&self, options: ConnectOptions) -> Result<Stream, ()> {
///         assert!(options.session.is_none());
///         Ok(Stream)
///     }
/// }
///
/// let transport = GuardedTransport::new(Transport);
/// let mut options = ConnectOptions::new("api.example.com", 443);
/// options.session = Some(vec![1, 2, 3]);
/// let mut stream = transport.connect(options).unwrap();
///
/// // Closed handle: the session is dropped instead of dereferencing it
/// assert!(!transport.set_session(&mut stream, Some(&[1u8, 2, 3][..])));
/// ```
#[derive(Debug, Clone)]
pub struct GuardedTransport<T, P = NoSessionReuse> {
    inner: T,
    policy: P,
}

impl<T: TlsTransport> GuardedTransport<T, NoSessionReuse> {
    /// Wrap a transport with the default policy
    pub fn new(inner: T) -> Self {
        Self::with_policy(inner, NoSessionReuse)
    }
}

impl<T: TlsTransport, P: SessionPolicy> GuardedTransport<T, P> {
    /// Wrap a transport with a custom policy
    pub fn with_policy(inner: T, policy: P) -> Self {
        Self { inner, policy }
    }

    /// Connect after letting the policy adjust the options
    pub fn connect(&self, mut options: ConnectOptions) -> Result<T::Stream, T::Error> {
        self.policy.prepare_connect(&mut options);
        self.inner.connect(options)
    }

    /// Install a session if the policy admits it; returns whether it was applied
    pub fn set_session(&self, stream: &mut T::Stream, session: Option<&[u8]>) -> bool {
        match session {
            Some(ticket) if self.policy.admit_session(stream.has_handle(), Some(ticket)) => {
                stream.apply_session(ticket);
                true
            }
            _ => false,
        }
    }

    /// The wrapped transport
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingStream {
        open: bool,
        applied: Vec<Vec<u8>>,
    }

    impl TlsStream for RecordingStream {
        fn has_handle(&self) -> bool {
            self.open
        }

        fn apply_session(&mut self, session: &[u8]) {
            self.applied.push(session.to_vec());
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        seen: RefCell<Vec<ConnectOptions>>,
    }

    impl TlsTransport for RecordingTransport {
        type Stream = RecordingStream;
        type Error = String;

        fn connect(&self, options: ConnectOptions) -> Result<Self::Stream, Self::Error> {
            self.seen.borrow_mut().push(options);
            Ok(RecordingStream {
                open: true,
                applied: Vec::new(),
            })
        }
    }

    #[test]
    fn test_connect_strips_session() {
        let transport = GuardedTransport::new(RecordingTransport::default());
        let mut options = ConnectOptions::new("example.com", 443);
        options.server_name = Some("api.example.com".to_string());
        options.session = Some(vec![9, 9]);

        transport.connect(options).unwrap();

        let seen = transport.inner().seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].session, None);
        assert_eq!(seen[0].server_name.as_deref(), Some("api.example.com"));
    }

    #[test]
    fn test_set_session_requires_open_handle() {
        let transport = GuardedTransport::new(RecordingTransport::default());
        let mut stream = transport.connect(ConnectOptions::new("example.com", 443)).unwrap();

        assert!(transport.set_session(&mut stream, Some(&b"ticket"[..])));
        assert_eq!(stream.applied, vec![b"ticket".to_vec()]);

        stream.open = false;
        assert!(!transport.set_session(&mut stream, Some(&b"late"[..])));
        assert_eq!(stream.applied.len(), 1);
    }

    #[test]
    fn test_set_session_ignores_missing_ticket() {
        let transport = GuardedTransport::new(RecordingTransport::default());
        let mut stream = transport.connect(ConnectOptions::new("example.com", 443)).unwrap();

        assert!(!transport.set_session(&mut stream, None));
        assert!(stream.applied.is_empty());
    }

    #[test]
    fn test_custom_policy_is_consulted() {
        struct PassThroughConnect;
        impl SessionPolicy for PassThroughConnect {
            fn admit_session(&self, _handle_open: bool, _session: Option<&[u8]>) -> bool {
                false
            }
            fn prepare_connect(&self, _options: &mut ConnectOptions) {}
        }

        let transport =
            GuardedTransport::with_policy(RecordingTransport::default(), PassThroughConnect);
        let mut options = ConnectOptions::new("example.com", 443);
        options.session = Some(vec![1]);
        let mut stream = transport.connect(options).unwrap();

        assert_eq!(transport.inner().seen.borrow()[0].session, Some(vec![1]));
        assert!(!transport.set_session(&mut stream, Some(&b"ticket"[..])));
    }
}
