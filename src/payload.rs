//! Request body posted to the classifier.

use crate::corpus::MessagePool;
use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::Serialize;

/// The classification guessed for a message. Assigned at random, unrelated to its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham,
    Spam,
}

impl Distribution<Label> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Label {
        if rng.gen::<bool>() {
            Label::Ham
        } else {
            Label::Spam
        }
    }
}

/// `{ "sms": ..., "guess": "ham" | "spam" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsPayload<'a> {
    pub sms: &'a str,
    pub guess: Label,
}

impl<'a> SmsPayload<'a> {
    /// Pick a message and a label independently and uniformly.
    pub fn random<R: Rng + ?Sized>(pool: &'a MessagePool, rng: &mut R) -> Option<Self> {
        let sms = pool.choose(rng)?;
        Some(Self {
            sms,
            guess: rng.gen(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool() -> MessagePool {
        let lines = vec![
            "free entry win now".to_string(),
            "call me later".to_string(),
            "ok see you then".to_string(),
        ];
        MessagePool::sample(lines, 2, &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_payload_wire_format() {
        let payload = SmsPayload {
            sms: "call me later",
            guess: Label::Spam,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "sms": "call me later", "guess": "spam" })
        );
        assert_eq!(serde_json::to_string(&Label::Ham).unwrap(), "\"ham\"");
    }

    #[test]
    fn test_random_payload_draws_from_pool() {
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen_ham = false;
        let mut seen_spam = false;

        for _ in 0..200 {
            let payload = SmsPayload::random(&pool, &mut rng).unwrap();
            assert!(pool.contains(payload.sms));
            match payload.guess {
                Label::Ham => seen_ham = true,
                Label::Spam => seen_spam = true,
            }
        }

        assert!(seen_ham && seen_spam);
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let pool = MessagePool::sample(Vec::new(), 10, &mut StdRng::seed_from_u64(1));
        assert!(SmsPayload::random(&pool, &mut StdRng::seed_from_u64(2)).is_none());
    }
}
