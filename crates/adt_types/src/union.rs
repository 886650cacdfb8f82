use adt::{SharedPredicate, TypePredicate, Value};

use crate::shared;

/// Member of any of the alternatives, tried in order.
#[derive(Clone, Default)]
pub struct Union {
    alternatives: Vec<SharedPredicate>,
}

impl Union {
    pub fn new(alternatives: impl IntoIterator<Item = SharedPredicate>) -> Self {
        Union {
            alternatives: alternatives.into_iter().collect(),
        }
    }

    /// Union of two predicates.
    pub fn of(a: impl TypePredicate + 'static, b: impl TypePredicate + 'static) -> Self {
        Union {
            alternatives: vec![shared(a), shared(b)],
        }
    }

    /// Add another alternative.
    #[must_use]
    pub fn or(mut self, alternative: impl TypePredicate + 'static) -> Self {
        self.alternatives.push(shared(alternative));
        self
    }
}

impl TypePredicate for Union {
    fn is_member(&self, value: &Value) -> bool {
        self.alternatives.iter().any(|alt| alt.is_member(value))
    }

    fn name(&self) -> String {
        let names: Vec<String> = self.alternatives.iter().map(|alt| alt.name()).collect();
        format!("Union[{}]", names.join(", "))
    }
}
