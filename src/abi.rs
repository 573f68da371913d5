use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_json_abi::JsonAbi;
use alloy_primitives::hex;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("[E050] Constructor expects {expected} arguments but the registry lists {found}\n\nSuggestions:\n  • Check constructor_args against the deployed contract's constructor\n  • Use an empty list for contracts without constructor arguments")]
    ArgumentCount { expected: usize, found: usize },

    #[error("[E051] Constructor argument #{index} can't be used as {ty}: {error}\n\nSuggestions:\n  • Write addresses and large integers as strings\n  • Write arrays as TOML arrays")]
    Coerce {
        index: usize,
        ty: String,
        error: String,
    },
}

impl AbiError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ArgumentCount { .. } => "E050",
            Self::Coerce { .. } => "E051",
        }
    }
}

/// Builds the value for `ty` from a registry value. JSON arrays fill
/// arrays and tuples element by element; strings for `string` parameters
/// are taken verbatim; any other scalar goes through `coerce_str`.
fn to_sol_value(ty: &DynSolType, value: &Value) -> Result<DynSolValue, String> {
    match (ty, value) {
        (DynSolType::String, Value::String(s)) => Ok(DynSolValue::String(s.clone())),
        (DynSolType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| to_sol_value(inner, item))
            .collect::<Result<_, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) => {
            check_len(*len, items)?;
            items
                .iter()
                .map(|item| to_sol_value(inner, item))
                .collect::<Result<_, _>>()
                .map(DynSolValue::FixedArray)
        }
        (DynSolType::Tuple(types), Value::Array(items)) => {
            check_len(types.len(), items)?;
            types
                .iter()
                .zip(items)
                .map(|(ty, item)| to_sol_value(ty, item))
                .collect::<Result<_, _>>()
                .map(DynSolValue::Tuple)
        }
        (_, Value::String(s)) => ty.coerce_str(s).map_err(|e| e.to_string()),
        (_, Value::Number(_) | Value::Bool(_)) => {
            ty.coerce_str(&value.to_string()).map_err(|e| e.to_string())
        }
        (_, other) => Err(format!("unexpected value {other}")),
    }
}

fn check_len(expected: usize, items: &[Value]) -> Result<(), String> {
    if items.len() == expected {
        Ok(())
    } else {
        Err(format!("expected {expected} elements, found {}", items.len()))
    }
}

/// ABI-encodes `args` against the constructor in `abi`, returning hex
/// without the `0x` prefix. An ABI without a constructor takes no
/// arguments.
///
/// # Errors
///
/// Fails if the number of arguments differs or a value can't be coerced
/// into its parameter type.
pub fn encode_constructor_args(abi: &JsonAbi, args: &[Value]) -> Result<String, AbiError> {
    let inputs = abi
        .constructor
        .as_ref()
        .map_or(&[][..], |constructor| constructor.inputs.as_slice());

    if inputs.len() != args.len() {
        return Err(AbiError::ArgumentCount {
            expected: inputs.len(),
            found: args.len(),
        });
    }

    if inputs.is_empty() {
        return Ok(String::new());
    }

    let values: Vec<DynSolValue> = inputs
        .iter()
        .zip(args)
        .enumerate()
        .map(|(index, (param, arg))| {
            let ty = param.selector_type();
            DynSolType::parse(&ty)
                .map_err(|e| e.to_string())
                .and_then(|parsed| to_sol_value(&parsed, arg))
                .map_err(|error| AbiError::Coerce {
                    index,
                    ty: ty.to_string(),
                    error,
                })
        })
        .collect::<Result<_, _>>()?;

    Ok(hex::encode(DynSolValue::Tuple(values).abi_encode_params()))
}
