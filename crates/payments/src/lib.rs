pub mod free_tier;
pub mod offerings;
pub mod verifier;

pub use free_tier::FreeTierTracker;
pub use offerings::{Offering, PaymentChallenge, PaymentTerms};
pub use verifier::{
    PaymentError, PaymentVerifier, PresenceVerifier, TxHashFormatVerifier, VerificationMode,
};
