/// Conversion of call arguments into plain JSON.
///
/// Normalization rides on `Serialize`: a `Contract` serializes as its address,
/// a pending `Execute` or `Instantiate` as its payload. Maps, sequences and
/// tuples that contain them come out in canonical form.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Normalize any serializable value into JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Build a `{method: args}` call payload. Arguments that normalize to `null`
/// become an empty object, so `call("reserve_nft", &())` is `{"reserve_nft": {}}`.
pub fn call<T: Serialize + ?Sized>(method: &str, args: &T) -> Result<Value> {
    let args = match to_json(args)? {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };

    let mut payload = Map::new();
    payload.insert(method.to_string(), args);
    Ok(Value::Object(payload))
}
