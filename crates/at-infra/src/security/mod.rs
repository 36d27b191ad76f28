mod file_crypto;

pub use file_crypto::XChaChaCryptoBridge;
