//! Cryptographic collaborators: content hashing and signature verification.
//!
//! The ledger consumes both as deterministic pure functions. Verification
//! has no error path beyond boolean failure: malformed keys, signatures,
//! or digests all verify as `false`.

use crate::types::Hash;
use bitcoin_hashes::{sha256d, Hash as BitcoinHash};
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1};
use sha2::{Digest, Sha256};

/// Hash: 𝕊 → ℍ
///
/// Double-SHA256 content digest used for transaction and block identity.
pub fn hash256(data: &[u8]) -> Hash {
    sha256d::Hash::hash(data).into_inner()
}

/// VerifySignature: 𝕊 × 𝕊 × 𝕊 → {true, false}
///
/// ECDSA over secp256k1. The public key is in serialized form, the
/// signature in DER, and the message is digested with SHA-256 before
/// verification.
pub fn verify_signature(pubkey_bytes: &[u8], message: &[u8], signature_bytes: &[u8]) -> bool {
    // Parse public key
    let pubkey = match PublicKey::from_slice(pubkey_bytes) {
        Ok(pk) => pk,
        Err(_) => return false,
    };

    // Parse signature (DER format)
    let signature = match Signature::from_der(signature_bytes) {
        Ok(sig) => sig,
        Err(_) => return false,
    };

    let digest = Sha256::digest(message);
    let message = match Message::from_digest_slice(digest.as_slice()) {
        Ok(m) => m,
        Err(_) => return false,
    };

    let secp = Secp256k1::verification_only();
    secp.verify_ecdsa(&message, &signature, &pubkey).is_ok()
}
