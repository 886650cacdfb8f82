use adt::{TypePredicate, Value};

/// Exactly one value, compared structurally.
#[derive(Clone, Debug)]
pub struct Literal {
    value: Value,
}

impl Literal {
    pub fn new(value: impl Into<Value>) -> Self {
        Literal {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl TypePredicate for Literal {
    fn is_member(&self, value: &Value) -> bool {
        self.value == *value
    }

    fn name(&self) -> String {
        format!("Literal[{}]", self.value)
    }
}

/// Every value, `nil` included.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Any;

impl TypePredicate for Any {
    fn is_member(&self, _value: &Value) -> bool {
        true
    }

    fn name(&self) -> String {
        "Any".to_string()
    }
}
