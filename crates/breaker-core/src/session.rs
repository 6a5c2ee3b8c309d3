//! Session - the caller's authenticated identity
//!
//! Exactly one session is live at a time; it is created on connect,
//! destroyed on disconnect, and passed explicitly to every component that
//! needs it rather than held in ambient state.

use stacks_codec::{Network, StacksAddress};

/// An operator session bound to one address on one network
#[derive(Debug, Clone)]
pub struct Session {
    address: StacksAddress,
    network: Network,
    authenticated: bool,
}

impl Session {
    /// Establish an authenticated session for `address`
    pub fn connect(address: StacksAddress, network: Network) -> Self {
        tracing::info!("session connected: {} on {}", address, network);
        Self {
            address,
            network,
            authenticated: true,
        }
    }

    /// Drop authentication; the session can no longer author submissions
    pub fn disconnect(&mut self) {
        tracing::info!("session disconnected: {}", self.address);
        self.authenticated = false;
    }

    pub fn address(&self) -> &StacksAddress {
        &self.address
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
