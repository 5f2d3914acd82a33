//! Anti-forgery token capability.

use std::cell::RefCell;
use std::collections::HashMap;

/// Issues and verifies anti-forgery tokens.
///
/// Forms that ask for a nonce field, and the `nonce` validator, call into
/// whatever implementation the host application injects.
pub trait AntiForgery {
    /// Issues a token bound to a purpose (e.g. `"contact-form"`).
    fn issue(&self, purpose: &str) -> String;

    /// Returns whether a submitted token was issued by this provider.
    fn verify(&self, token: &str) -> bool;
}

/// In-memory tokens for the lifetime of one session.
#[derive(Debug, Default)]
pub struct SessionTokens {
    issued: RefCell<HashMap<String, String>>,
}

impl SessionTokens {
    /// Creates a provider with no issued tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the purpose a token was issued for.
    pub fn purpose_of(&self, token: &str) -> Option<String> {
        self.issued.borrow().get(token).cloned()
    }

    /// Forgets a token so it no longer verifies.
    pub fn revoke(&self, token: &str) -> bool {
        self.issued.borrow_mut().remove(token).is_some()
    }
}

impl AntiForgery for SessionTokens {
    fn issue(&self, purpose: &str) -> String {
        let token = generate_token();
        self.issued
            .borrow_mut()
            .insert(token.clone(), purpose.to_string());
        token
    }

    fn verify(&self, token: &str) -> bool {
        self.issued.borrow().contains_key(token)
    }
}

fn generate_token() -> String {
    use rand::RngExt;
    let mut rng = rand::rng();
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
