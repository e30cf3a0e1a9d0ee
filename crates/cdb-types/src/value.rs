//! Typed scalar values and the validation that binds them to a key's type.
//!
//! A config value holds exactly one of four scalars. On the wire (and in
//! storage rows) the scalar travels as four optional fields next to a
//! declared `valueType`; [`validate`] is the single place where that loose
//! shape is checked and turned into a [`ConfigScalar`]. Once a value is a
//! `ConfigScalar` the one-field-populated invariant holds by construction.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::prelude::*;

/// Declared scalar type of a config key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
	#[serde(rename = "STRING")]
	String,
	#[serde(rename = "INTEGER")]
	Integer,
	#[serde(rename = "FLOAT")]
	Float,
	#[serde(rename = "BOOLEAN")]
	Boolean,
}

impl ValueType {
	/// Storage code of the type
	pub fn code(self) -> i64 {
		match self {
			ValueType::String => 0,
			ValueType::Integer => 1,
			ValueType::Float => 2,
			ValueType::Boolean => 3,
		}
	}

	pub fn from_code(code: i64) -> Option<ValueType> {
		match code {
			0 => Some(ValueType::String),
			1 => Some(ValueType::Integer),
			2 => Some(ValueType::Float),
			3 => Some(ValueType::Boolean),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			ValueType::String => "STRING",
			ValueType::Integer => "INTEGER",
			ValueType::Float => "FLOAT",
			ValueType::Boolean => "BOOLEAN",
		}
	}

	/// Wire name of the scalar field holding values of this type
	fn field_name(self) -> &'static str {
		match self {
			ValueType::String => "strValue",
			ValueType::Integer => "intValue",
			ValueType::Float => "floatValue",
			ValueType::Boolean => "boolValue",
		}
	}
}

impl std::fmt::Display for ValueType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The four optional scalar fields as they appear on the wire and in rows
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarFields {
	pub str_value: Option<String>,
	pub int_value: Option<i64>,
	pub float_value: Option<f64>,
	pub bool_value: Option<bool>,
}

impl ScalarFields {
	/// Types whose field is populated, in declaration order
	fn populated(&self) -> Vec<ValueType> {
		let mut types = Vec::with_capacity(1);
		if self.str_value.is_some() {
			types.push(ValueType::String);
		}
		if self.int_value.is_some() {
			types.push(ValueType::Integer);
		}
		if self.float_value.is_some() {
			types.push(ValueType::Float);
		}
		if self.bool_value.is_some() {
			types.push(ValueType::Boolean);
		}
		types
	}
}

/// A validated scalar: exactly one value of exactly one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ValueInput", try_from = "ValueInput")]
pub enum ConfigScalar {
	Str(String),
	Int(i64),
	Float(f64),
	Bool(bool),
}

impl ConfigScalar {
	pub fn value_type(&self) -> ValueType {
		match self {
			ConfigScalar::Str(_) => ValueType::String,
			ConfigScalar::Int(_) => ValueType::Integer,
			ConfigScalar::Float(_) => ValueType::Float,
			ConfigScalar::Bool(_) => ValueType::Boolean,
		}
	}

	/// Fails with `NotValid` unless this scalar is of the expected type
	pub fn check_type(&self, expected: ValueType) -> ClResult<()> {
		if self.value_type() == expected {
			Ok(())
		} else {
			Err(Error::NotValid(format!(
				"{} value cannot be stored under a {} key",
				self.value_type(),
				expected
			)))
		}
	}

	pub fn to_fields(&self) -> ScalarFields {
		let mut fields = ScalarFields::default();
		match self {
			ConfigScalar::Str(v) => fields.str_value = Some(v.clone()),
			ConfigScalar::Int(v) => fields.int_value = Some(*v),
			ConfigScalar::Float(v) => fields.float_value = Some(*v),
			ConfigScalar::Bool(v) => fields.bool_value = Some(*v),
		}
		fields
	}
}

impl std::fmt::Display for ConfigScalar {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ConfigScalar::Str(v) => f.write_str(v),
			ConfigScalar::Int(v) => write!(f, "{}", v),
			ConfigScalar::Float(v) => write!(f, "{:.6}", v),
			ConfigScalar::Bool(v) => write!(f, "{}", v),
		}
	}
}

/// Unvalidated value: a declared type plus the raw scalar fields
///
/// This is what callers hand to `SetConfigurationValue`. The declared type is
/// only trusted when a key has to be created for it; otherwise it is replaced
/// by the key's type before validation.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueInput {
	pub value_type: Option<ValueType>,
	#[serde(flatten)]
	pub fields: ScalarFields,
}

impl ValueInput {
	pub fn string(value: impl Into<String>) -> Self {
		ConfigScalar::Str(value.into()).into()
	}

	pub fn integer(value: i64) -> Self {
		ConfigScalar::Int(value).into()
	}

	pub fn float(value: f64) -> Self {
		ConfigScalar::Float(value).into()
	}

	pub fn boolean(value: bool) -> Self {
		ConfigScalar::Bool(value).into()
	}

	pub fn with_value_type(mut self, value_type: Option<ValueType>) -> Self {
		self.value_type = value_type;
		self
	}
}

impl From<ConfigScalar> for ValueInput {
	fn from(scalar: ConfigScalar) -> Self {
		ValueInput { value_type: Some(scalar.value_type()), fields: scalar.to_fields() }
	}
}

impl TryFrom<ValueInput> for ConfigScalar {
	type Error = Error;

	fn try_from(input: ValueInput) -> ClResult<Self> {
		validate(input.value_type, input.fields)
	}
}

/// Checks that exactly the field matching `value_type` is populated
///
/// Zero populated fields, more than one, a field of the wrong type, or a
/// missing type all fail with `NotValid`. So do NaN and infinite floats.
pub fn validate(value_type: Option<ValueType>, fields: ScalarFields) -> ClResult<ConfigScalar> {
	let Some(value_type) = value_type else {
		return Err(Error::NotValid("unrecognised value type".into()));
	};

	let populated = fields.populated();
	if let Some(other) = populated.iter().find(|t| **t != value_type) {
		return Err(Error::NotValid(format!(
			"{} must be unset for a {} value",
			other.field_name(),
			value_type
		)));
	}

	let scalar = match value_type {
		ValueType::String => fields.str_value.map(ConfigScalar::Str),
		ValueType::Integer => fields.int_value.map(ConfigScalar::Int),
		ValueType::Float => fields.float_value.map(ConfigScalar::Float),
		ValueType::Boolean => fields.bool_value.map(ConfigScalar::Bool),
	};
	match scalar {
		Some(ConfigScalar::Float(v)) if !v.is_finite() => {
			Err(Error::NotValid(format!("floatValue must be finite, got {}", v)))
		}
		Some(scalar) => Ok(scalar),
		None => Err(Error::NotValid(format!(
			"{} must be set for a {} value",
			value_type.field_name(),
			value_type
		))),
	}
}


// vim: ts=4
