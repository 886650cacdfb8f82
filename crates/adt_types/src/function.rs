use adt::{SharedPredicate, TypePredicate, Value};

/// Any host function.
///
/// Parameter types are descriptive only: host functions carry no signature,
/// so membership cannot check them.
#[derive(Clone, Default)]
pub struct Function {
    params: Vec<SharedPredicate>,
}

impl Function {
    pub fn new() -> Self {
        Function::default()
    }

    /// A function type documenting its parameter types.
    pub fn with_params(params: impl IntoIterator<Item = SharedPredicate>) -> Self {
        Function {
            params: params.into_iter().collect(),
        }
    }
}

impl TypePredicate for Function {
    fn is_member(&self, value: &Value) -> bool {
        matches!(value, Value::Function(_))
    }

    fn name(&self) -> String {
        if self.params.is_empty() {
            return "Function".to_string();
        }
        let names: Vec<String> = self.params.iter().map(|p| p.name()).collect();
        format!("Function[{}]", names.join(", "))
    }
}
