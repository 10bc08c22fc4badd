use crate::arg::Arg;
use crate::body::{Reader, Writer};
use crate::error::{ErrorKind, Result};
use crate::proto::Type;
use crate::value::Value;

/// A position in a call frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The n-th argument of the call.
    Arg(usize),
    /// The return position.
    Ret,
}

/// The declared storage class of a call frame slot.
///
/// [`Object`] is the generic boxed class every value can be stored under;
/// the remaining classes are the raw machine representations of the basic
/// types.
///
/// [`Object`]: SlotClass::Object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotClass {
    /// A boxed host value of any class.
    Object,
    /// An 8-bit unsigned integer.
    Byte,
    /// A boolean.
    Bool,
    /// A 16-bit signed integer.
    Int16,
    /// A 16-bit unsigned integer.
    Uint16,
    /// A 32-bit signed integer.
    Int32,
    /// A 32-bit unsigned integer.
    Uint32,
    /// A 64-bit signed integer.
    Int64,
    /// A 64-bit unsigned integer.
    Uint64,
    /// A double-precision floating point number.
    Double,
    /// A borrowed UTF-8 string.
    Str,
}

/// Read and write access to the arguments and return value of a call in
/// flight.
///
/// Every slot declares the class it stores values under; the argument
/// bridge refuses to touch a slot whose declared class does not match the
/// argument's expectation.
pub trait CallFrame {
    /// The declared class of a slot.
    fn slot_class(&self, slot: Slot) -> SlotClass;

    /// Load the value stored in a slot.
    fn load(&self, slot: Slot) -> Result<Value>;

    /// Store a value into a slot.
    fn store(&mut self, slot: Slot, value: Value) -> Result<()>;
}

impl Arg {
    /// Unmarshal a value off the iterator directly into a call frame slot.
    ///
    /// With `boxed` set the slot must be declared [`SlotClass::Object`];
    /// without it the slot must match the argument's raw machine class. A
    /// mismatch is a contract violation and nothing is read.
    pub fn unmarshal_into(
        &self,
        iter: &mut Reader<'_>,
        frame: &mut dyn CallFrame,
        slot: Slot,
        boxed: bool,
    ) -> Result<()> {
        self.check_slot(frame.slot_class(slot), boxed)?;
        let value = self.unmarshal(iter)?;
        frame.store(slot, value)
    }

    /// Marshal the value in a call frame slot onto the iterator.
    pub fn marshal_from(
        &self,
        frame: &dyn CallFrame,
        slot: Slot,
        iter: &mut Writer<'_>,
        boxed: bool,
    ) -> Result<()> {
        self.check_slot(frame.slot_class(slot), boxed)?;
        let value = frame.load(slot)?;
        self.marshal(&value, iter)
    }

    fn check_slot(&self, declared: SlotClass, boxed: bool) -> Result<()> {
        let expected = if boxed {
            SlotClass::Object
        } else {
            self.unboxed_class()
        };

        if declared != expected {
            return Err(ErrorKind::HostTypeMismatch {
                expected,
                actual: declared,
            }
            .into());
        }

        Ok(())
    }

    /// The raw machine class of this argument's unboxed representation.
    ///
    /// Containers and variants only exist boxed.
    fn unboxed_class(&self) -> SlotClass {
        match self.dbus_type() {
            Type::BYTE => SlotClass::Byte,
            Type::BOOLEAN => SlotClass::Bool,
            Type::INT16 => SlotClass::Int16,
            Type::UINT16 => SlotClass::Uint16,
            Type::INT32 => SlotClass::Int32,
            Type::UINT32 => SlotClass::Uint32,
            Type::INT64 => SlotClass::Int64,
            Type::UINT64 => SlotClass::Uint64,
            Type::DOUBLE => SlotClass::Double,
            Type::STRING | Type::OBJECT_PATH | Type::SIGNATURE => SlotClass::Str,
            _ => SlotClass::Object,
        }
    }
}
