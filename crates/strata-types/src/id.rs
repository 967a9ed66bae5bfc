use rand::Rng;

/// Generate an opaque random identifier.
///
/// Eight random bytes, hex encoded. Used for collection document
/// identifiers when neither the caller nor the schema supplies one.
pub fn generate_id() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}
