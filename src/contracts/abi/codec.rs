use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{Address, U256};

use crate::error::{Result, UniversityError};

/// Finds the overload of `name` taking exactly `arity` arguments.
pub fn find_function<'a>(abi: &'a JsonAbi, name: &str, arity: usize) -> Result<&'a Function> {
    let overloads = abi
        .function(name)
        .ok_or_else(|| UniversityError::Abi(format!("function not found: {}", name)))?;
    overloads
        .iter()
        .find(|f| f.inputs.len() == arity)
        .ok_or_else(|| {
            UniversityError::Abi(format!(
                "{} does not take {} argument(s)",
                name, arity
            ))
        })
}

pub fn uint(value: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 256)
}

pub fn uint_array(values: &[u64]) -> DynSolValue {
    DynSolValue::Array(values.iter().copied().map(uint).collect())
}

pub fn string(value: impl Into<String>) -> DynSolValue {
    DynSolValue::String(value.into())
}

pub fn address(value: Address) -> DynSolValue {
    DynSolValue::Address(value)
}

/// Positional field of a decoded return tuple.
pub fn field<'a>(values: &'a [DynSolValue], index: usize) -> Result<&'a DynSolValue> {
    values.get(index).ok_or_else(|| {
        UniversityError::Abi(format!(
            "expected at least {} return value(s), got {}",
            index + 1,
            values.len()
        ))
    })
}

pub fn as_u64(value: &DynSolValue) -> Result<u64> {
    let (number, _) = value
        .as_uint()
        .ok_or_else(|| UniversityError::Abi(format!("expected uint, got {:?}", value)))?;
    u64::try_from(number)
        .map_err(|_| UniversityError::Abi(format!("{} does not fit in u64", number)))
}

pub fn as_string(value: &DynSolValue) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| UniversityError::Abi(format!("expected string, got {:?}", value)))
}

pub fn as_u64_list(value: &DynSolValue) -> Result<Vec<u64>> {
    as_list(value)?.iter().map(as_u64).collect()
}

pub fn as_string_list(value: &DynSolValue) -> Result<Vec<String>> {
    as_list(value)?.iter().map(as_string).collect()
}

fn as_list(value: &DynSolValue) -> Result<&[DynSolValue]> {
    value
        .as_array()
        .ok_or_else(|| UniversityError::Abi(format!("expected array, got {:?}", value)))
}
