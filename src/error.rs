use thiserror::Error;

/// Errors produced by the deployer library
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or incomplete configuration, detected before any chain call
    #[error("configuration error: {0}")]
    Config(String),

    /// The transaction was included in a block but its execution failed
    #[error("transaction {tx_hash} failed with code {code}: {raw_log}")]
    TxExecution {
        tx_hash: String,
        code: u32,
        raw_log: String,
    },

    /// The node refused the transaction before it reached a block
    #[error("transaction rejected by node (code {code}): {raw_log}")]
    CheckTx { code: u32, raw_log: String },

    #[error("transaction {0} was not included in a block in time")]
    TxTimeout(String),

    #[error("gRPC request failed: {0}")]
    Grpc(#[from] tonic::Status),

    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("client not connected, call connect() first")]
    NotConnected,

    #[error("unexpected response from node: {0}")]
    UnexpectedResponse(String),

    #[error("could not parse contract address -- tx logs are empty")]
    AddressParse,

    #[error("could not parse code id from store-code logs")]
    CodeIdParse,

    #[error("key error: {0}")]
    Key(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("protobuf encoding failed: {0}")]
    Encode(#[from] prost::EncodeError),

    #[error("protobuf decoding failed: {0}")]
    Decode(#[from] prost::DecodeError),
}

impl Error {
    /// Whether this error came from the chain or the network, as opposed to a
    /// local logic failure. Only these leave the cached sequence untrusted.
    pub fn is_chain_failure(&self) -> bool {
        matches!(
            self,
            Error::CheckTx { .. }
                | Error::TxTimeout(_)
                | Error::Grpc(_)
                | Error::Transport(_)
                | Error::NotConnected
                | Error::UnexpectedResponse(_)
        )
    }
}

impl From<secp256k1::Error> for Error {
    fn from(e: secp256k1::Error) -> Self {
        Error::Key(e.to_string())
    }
}

impl From<bip32::Error> for Error {
    fn from(e: bip32::Error) -> Self {
        Error::Key(e.to_string())
    }
}

impl From<bip39::Error> for Error {
    fn from(e: bip39::Error) -> Self {
        Error::Key(e.to_string())
    }
}

/// A result type with our error type provided as the default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_failure_classification() {
        assert!(Error::CheckTx { code: 32, raw_log: "account sequence mismatch".into() }.is_chain_failure());
        assert!(Error::TxTimeout("ABC".into()).is_chain_failure());
        assert!(Error::Grpc(tonic::Status::unavailable("down")).is_chain_failure());
        assert!(Error::NotConnected.is_chain_failure());

        // Included transactions and local failures leave the sequence alone
        assert!(!Error::TxExecution { tx_hash: "ABC".into(), code: 5, raw_log: "out of funds".into() }.is_chain_failure());
        assert!(!Error::Config("no key".into()).is_chain_failure());
        assert!(!Error::AddressParse.is_chain_failure());
        assert!(!Error::Key("bad key".into()).is_chain_failure());
    }
}
