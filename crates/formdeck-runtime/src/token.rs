#![forbid(unsafe_code)]

//! Request generation tokens.
//!
//! Each background request carries the token that was current when it was
//! issued. By the time its result arrives the state may have moved on; the
//! result is applied only if its token still matches. Latest request wins,
//! earlier in-flight responses are dropped.

/// A monotonically increasing request generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// The null token. Never issued, so a result stamped with it can never
    /// match a live request.
    pub const NONE: Self = Self(0);

    /// The raw generation number.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

/// Issues tokens in strictly increasing order.
#[derive(Debug, Clone, Default)]
pub struct TokenSource {
    next: u64,
}

impl TokenSource {
    /// A source whose first token is generation 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Issue the next token. Never returns [`RequestToken::NONE`].
    pub fn issue(&mut self) -> RequestToken {
        self.next += 1;
        RequestToken(self.next)
    }
}
