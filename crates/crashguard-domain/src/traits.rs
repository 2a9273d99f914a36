//! Trait definitions for external interactions
//!
//! These traits define the boundary between the maintenance layer and the
//! host's networking stack. Implementations live in the host.

use crate::session::ConnectOptions;

/// An established TLS stream
///
/// Implemented by the host's TLS layer
pub trait TlsStream {
    /// Whether the underlying connection handle is still open
    fn has_handle(&self) -> bool;

    /// Install a session ticket for resumption
    ///
    /// Only called when the handle is open and a session is present.
    fn apply_session(&mut self, session: &[u8]);
}

/// Outbound TLS connector
///
/// Implemented by the host's TLS layer
pub trait TlsTransport {
    /// Stream produced by a successful connect
    type Stream: TlsStream;

    /// Error type for connect operations
    type Error;

    /// Open a connection with the given options
    fn connect(&self, options: ConnectOptions) -> Result<Self::Stream, Self::Error>;
}

/// Capability set a transport is composed with
///
/// Replaces patching the networking library in place: the host builds its
/// transport around a policy and every session decision goes through it.
pub trait SessionPolicy {
    /// Decide whether a session may be installed on a stream
    fn admit_session(&self, handle_open: bool, session: Option<&[u8]>) -> bool;

    /// Adjust connect options before they reach the transport
    fn prepare_connect(&self, options: &mut ConnectOptions);
}
