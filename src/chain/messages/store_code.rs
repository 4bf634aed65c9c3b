use cosmos_sdk_proto::cosmwasm::wasm::v1::MsgStoreCode;
use cosmos_sdk_proto::Any;
use prost::Message as _;
use std::path::Path;

use super::{MessageBuilder, MSG_STORE_CODE_TYPE_URL};
use crate::error::Result;

/// Pending upload of a compiled contract binary
#[derive(Clone, PartialEq)]
pub struct StoreCode {
    pub name: String,
    pub wasm: Vec<u8>,
}

impl StoreCode {
    pub fn new(name: impl Into<String>, wasm: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            wasm,
        }
    }

    /// Read `<dir>/<name>.wasm`
    pub fn from_artifacts(dir: &Path, name: &str) -> Result<Self> {
        let path = dir.join(format!("{}.wasm", name));
        let wasm = std::fs::read(&path)?;
        log::debug!("Read {} bytes from {}", wasm.len(), path.display());
        Ok(Self::new(name, wasm))
    }
}

// The wasm blob is too large to be useful in debug output
impl std::fmt::Debug for StoreCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCode")
            .field("name", &self.name)
            .field("wasm_len", &self.wasm.len())
            .finish()
    }
}

impl MessageBuilder for StoreCode {
    fn to_any(&self, sender: &str) -> Result<Any> {
        let msg = MsgStoreCode {
            sender: sender.to_string(),
            wasm_byte_code: self.wasm.clone(),
            ..Default::default()
        };
        Ok(Any {
            type_url: MSG_STORE_CODE_TYPE_URL.to_string(),
            value: msg.encode_to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_artifact_by_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cw721_base.wasm"), b"\0asm fake").unwrap();

        let msg = StoreCode::from_artifacts(dir.path(), "cw721_base").unwrap();
        assert_eq!(msg.name, "cw721_base");

        let decoded = MsgStoreCode::decode(&msg.to_any("terra1sender").unwrap().value[..]).unwrap();
        assert_eq!(decoded.wasm_byte_code, b"\0asm fake".to_vec());
        assert_eq!(decoded.sender, "terra1sender");
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = StoreCode::from_artifacts(dir.path(), "missing");
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }
}
