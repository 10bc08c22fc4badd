use log::{debug, warn};

use crate::body::{Reader, Writer};
use crate::error::{ErrorKind, Result};
use crate::proto::Type;
use crate::value::Value;

use super::node::ArgKind;
use super::Arg;

impl Arg {
    /// Read one complete value for this argument off the reader.
    pub fn unmarshal(&self, iter: &mut Reader<'_>) -> Result<Value> {
        match self.kind {
            ArgKind::Scalar => {
                let basic = iter.load_basic(self.dbus_type())?;
                self.box_value(basic)
            }
            ArgKind::Array { dictionary } => self.unmarshal_array(iter, dictionary),
            ArgKind::Struct => {
                self.check_arg_type(iter, Type::STRUCT)?;
                let mut sub = iter.recurse()?;
                let mut fields = Vec::with_capacity(self.children.len());

                for child in &self.children {
                    fields.push(child.unmarshal(&mut sub)?);
                }

                Ok(Value::Array(fields))
            }
            ArgKind::DictEntry => {
                let (key, value) = self.unmarshal_entry(iter)?;
                Ok(Value::Array(vec![key, value]))
            }
            ArgKind::Variant => {
                self.check_arg_type(iter, Type::VARIANT)?;
                let mut sub = iter.recurse()?;

                // A tolerant reading of an empty contained signature: there
                // is no value to produce, so the null marker stands in.
                if sub.signature().is_empty() {
                    return Ok(Value::Null);
                }

                // The transient argument carries this variant's parent so
                // that contained object paths stay scoped.
                let transient = Arg::from_signature(sub.signature(), None, self.parent.clone())?;
                transient.unmarshal(&mut sub)
            }
        }
    }

    /// Write one complete value for this argument onto the writer.
    pub fn marshal(&self, value: &Value, iter: &mut Writer<'_>) -> Result<()> {
        iter.record_signature(self.signature());

        match self.kind {
            ArgKind::Scalar => {
                let basic = self.unbox(value)?;
                iter.append_basic(basic)
            }
            ArgKind::Array { dictionary: false } => {
                let Value::Array(items) = value else {
                    return Err(ErrorKind::Unrepresentable {
                        expected: Type::ARRAY,
                        actual: value.class_name(),
                    }
                    .into());
                };

                let element = &self.children[0];
                let mut sub = iter.open_array(element.signature())?;

                for item in items {
                    // A child error drops `sub`, closing the container on
                    // the error path before the failure propagates.
                    element.marshal(item, &mut sub)?;
                }

                sub.finish()
            }
            ArgKind::Array { dictionary: true } => {
                let Value::Map(pairs) = value else {
                    return Err(ErrorKind::Unrepresentable {
                        expected: Type::ARRAY,
                        actual: value.class_name(),
                    }
                    .into());
                };

                let entry = &self.children[0];
                let mut sub = iter.open_array(entry.signature())?;

                for (key, value) in pairs {
                    entry.marshal_entry(key, value, &mut sub)?;
                }

                sub.finish()
            }
            ArgKind::Struct => {
                let Value::Array(fields) = value else {
                    return Err(ErrorKind::Unrepresentable {
                        expected: Type::STRUCT,
                        actual: value.class_name(),
                    }
                    .into());
                };

                if fields.len() != self.children.len() {
                    return Err(ErrorKind::StructFieldCount {
                        expected: self.children.len(),
                        actual: fields.len(),
                    }
                    .into());
                }

                let mut sub = iter.open_struct()?;

                for (child, field) in self.children.iter().zip(fields) {
                    child.marshal(field, &mut sub)?;
                }

                sub.finish()
            }
            ArgKind::DictEntry => {
                let Value::Array(pair) = value else {
                    return Err(ErrorKind::Unrepresentable {
                        expected: Type::DICT_ENTRY,
                        actual: value.class_name(),
                    }
                    .into());
                };

                let [key, entry_value] = pair.as_slice() else {
                    return Err(ErrorKind::StructFieldCount {
                        expected: 2,
                        actual: pair.len(),
                    }
                    .into());
                };

                self.marshal_entry(key, entry_value, iter)
            }
            ArgKind::Variant => {
                let signature = value.infer_signature()?;
                debug!("variant taking signature {:?}", signature.as_str());

                let transient = Arg::from_signature(&signature, None, self.parent.clone())?;
                let mut sub = iter.open_variant(&signature)?;
                transient.marshal(value, &mut sub)?;
                sub.finish()
            }
        }
    }

    fn unmarshal_array(&self, iter: &mut Reader<'_>, dictionary: bool) -> Result<Value> {
        self.check_arg_type(iter, Type::ARRAY)?;

        let element = &self.children[0];

        match iter.element_type() {
            Some(ty) if ty == element.dbus_type() => {}
            actual => {
                return Err(ErrorKind::WireTypeMismatch {
                    expected: element.dbus_type(),
                    actual: actual.unwrap_or(Type::INVALID),
                }
                .into())
            }
        }

        let mut sub = iter.recurse()?;

        if dictionary {
            let mut pairs: Vec<(Value, Value)> = Vec::new();

            while sub.has_more() {
                let (key, value) = element.unmarshal_entry(&mut sub)?;

                // The D-Bus specification permits but does not require
                // rejecting duplicate keys; the first value wins here.
                if pairs.iter().any(|(seen, _)| *seen == key) {
                    warn!("discarding duplicate dictionary key {key:?}");
                    continue;
                }

                pairs.push((key, value));
            }

            Ok(Value::Map(pairs))
        } else {
            let mut items = Vec::new();

            while sub.has_more() {
                items.push(element.unmarshal(&mut sub)?);
            }

            Ok(Value::Array(items))
        }
    }

    /// Read a dict entry as a key-value pair.
    pub(crate) fn unmarshal_entry(&self, iter: &mut Reader<'_>) -> Result<(Value, Value)> {
        self.check_arg_type(iter, Type::DICT_ENTRY)?;

        let mut sub = iter.recurse()?;
        let key = self.children[0].unmarshal(&mut sub)?;
        let value = self.children[1].unmarshal(&mut sub)?;
        Ok((key, value))
    }

    /// Write a key-value pair as a dict entry.
    pub(crate) fn marshal_entry(
        &self,
        key: &Value,
        value: &Value,
        iter: &mut Writer<'_>,
    ) -> Result<()> {
        let mut sub = iter.open_dict_entry()?;
        self.children[0].marshal(key, &mut sub)?;
        self.children[1].marshal(value, &mut sub)?;
        sub.finish()
    }

    fn check_arg_type(&self, iter: &Reader<'_>, expected: Type) -> Result<()> {
        match iter.arg_type() {
            Some(ty) if ty == expected => Ok(()),
            actual => Err(ErrorKind::WireTypeMismatch {
                expected,
                actual: actual.unwrap_or(Type::INVALID),
            }
            .into()),
        }
    }
}
