//! Signed, expiring entry codes presented at the venue gate.
//!
//! Codes are HS256 JWTs carrying the member ticket id (`ticketId`), the
//! entry state at issue time (`state`) and a standard `exp` claim. The
//! embedded state is informational; the gate re-validates the transition
//! against the live member ticket.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::TicketError;
use crate::member_ticket::{EntryState, MemberTicket};
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryCodePayload {
    pub member_ticket_id: DbId,
    pub entry_state: EntryState,
}

impl From<&MemberTicket> for EntryCodePayload {
    fn from(member_ticket: &MemberTicket) -> Self {
        Self {
            member_ticket_id: member_ticket.id,
            entry_state: member_ticket.entry_state,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryCodeClaims {
    #[serde(rename = "ticketId")]
    ticket_id: DbId,
    state: i16,
    exp: i64,
}

/// Encodes and decodes entry codes with a shared HMAC secret.
#[derive(Clone)]
pub struct EntryCodeCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl EntryCodeCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiration is checked against the injected clock in `decode`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a code for `payload` that stops being valid at `expires_at`.
    pub fn encode(
        &self,
        payload: EntryCodePayload,
        now: Timestamp,
        expires_at: Timestamp,
    ) -> Result<String, TicketError> {
        if expires_at <= now {
            return Err(TicketError::InvalidExpiration);
        }
        let claims = EntryCodeClaims {
            ticket_id: payload.member_ticket_id,
            state: payload.entry_state.index(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign entry code");
            TicketError::CodeInvalid
        })
    }

    /// Verify `code` and extract its payload.
    ///
    /// A bad signature or malformed token is [`TicketError::CodeInvalid`]
    /// even when it is also past its expiration.
    pub fn decode(&self, code: &str, now: Timestamp) -> Result<EntryCodePayload, TicketError> {
        let claims = decode::<EntryCodeClaims>(code, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected entry code");
                TicketError::CodeInvalid
            })?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(TicketError::CodeExpired);
        }

        let entry_state =
            EntryState::from_index(claims.state).map_err(|_| TicketError::CodeInvalid)?;

        Ok(EntryCodePayload {
            member_ticket_id: claims.ticket_id,
            entry_state,
        })
    }
}
