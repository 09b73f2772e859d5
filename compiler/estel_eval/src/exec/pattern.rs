//! Assignment targets and destructuring.

use estel_ir::{kinds, Name, NodeId};
use estel_runtime::{
    invalid_assignment_target, malformed_node, ControlAction, EvalError, Fields, Local, ScopeRef,
    Value,
};

use super::member::{get_property, iterate_values, set_property};
use crate::interpreter::Interpreter;

/// How a pattern's identifiers receive their values.
#[derive(Clone, Copy)]
pub enum Binding<'s> {
    /// Write the cell in this scope (declarations and parameters).
    Declare(&'s ScopeRef),
    /// Write the nearest existing cell (plain assignment).
    Assign,
}

/// A single writable location.
pub enum Place {
    /// A name resolved through the scope chain.
    Binding(Name),
    /// A property of an evaluated base.
    Property { base: Value, key: Name },
}

impl Interpreter<'_> {
    /// Evaluate an `Identifier` or `MemberExpression` target to a place,
    /// evaluating its base and key once.
    pub fn place(&mut self, target: NodeId, scope: &ScopeRef) -> Result<Place, ControlAction> {
        let tree = self.tree();
        if let Some(name) = tree.identifier_name(target) {
            return Ok(Place::Binding(name.clone()));
        }
        if tree.is(target, kinds::MEMBER_EXPRESSION) {
            let object = self.required_child(target, "object")?;
            let base = self.eval(object, scope)?;
            let key = self.property_key(target, "property", scope)?;
            return Ok(Place::Property { base, key });
        }
        Err(invalid_assignment_target(tree.tag(target)).into())
    }

    pub fn read_place(place: &Place, scope: &ScopeRef) -> Result<Value, EvalError> {
        match place {
            Place::Binding(name) => Ok(scope.get(name).unwrap_or_default()),
            Place::Property { base, key } => get_property(base, key),
        }
    }

    pub fn write_place(&self, place: Place, value: Value, scope: &ScopeRef) -> Result<(), EvalError> {
        match place {
            Place::Binding(name) => {
                scope.set(name, value);
                Ok(())
            }
            Place::Property { base, key } => {
                set_property(&base, key, value, self.config().max_array_length)
            }
        }
    }

    /// Bind `value` to a pattern: an identifier, a member target (assignment
    /// only), or an object/array destructuring pattern with defaults and
    /// rest elements. Defaults are evaluated in `scope`.
    pub fn bind_pattern(
        &mut self,
        pattern: NodeId,
        value: Value,
        scope: &ScopeRef,
        binding: Binding<'_>,
    ) -> Result<(), ControlAction> {
        let tree = self.tree();
        match tree.tag(pattern).as_str() {
            kinds::IDENTIFIER => {
                let name = tree
                    .identifier_name(pattern)
                    .ok_or_else(|| malformed_node(kinds::IDENTIFIER, "missing `name`"))?;
                match binding {
                    Binding::Declare(target) => {
                        target.declare_own(name.clone(), Some(value));
                    }
                    Binding::Assign => {
                        scope.set(name.clone(), value);
                    }
                }
            }
            kinds::MEMBER_EXPRESSION if matches!(binding, Binding::Assign) => {
                let place = self.place(pattern, scope)?;
                self.write_place(place, value, scope)?;
            }
            kinds::ASSIGNMENT_PATTERN => {
                let left = self.required_child(pattern, "left")?;
                let value = if value.is_undefined() {
                    let right = self.required_child(pattern, "right")?;
                    self.eval(right, scope)?
                } else {
                    value
                };
                self.bind_pattern(left, value, scope, binding)?;
            }
            kinds::OBJECT_PATTERN => self.bind_object_pattern(pattern, &value, scope, binding)?,
            kinds::ARRAY_PATTERN => {
                let items = iterate_values(&value)?;
                for (index, element) in tree.children(pattern, "elements").iter().enumerate() {
                    let Some(element) = *element else {
                        continue;
                    };
                    if tree.is(element, kinds::REST_ELEMENT) {
                        let argument = self.required_child(element, "argument")?;
                        let rest = items.get(index..).unwrap_or_default().to_vec();
                        self.bind_pattern(argument, Value::array(rest), scope, binding)?;
                        break;
                    }
                    let item = items.get(index).cloned().unwrap_or_default();
                    self.bind_pattern(element, item, scope, binding)?;
                }
            }
            other => return Err(invalid_assignment_target(other).into()),
        }
        Ok(())
    }

    fn bind_object_pattern(
        &mut self,
        pattern: NodeId,
        value: &Value,
        scope: &ScopeRef,
        binding: Binding<'_>,
    ) -> Result<(), ControlAction> {
        let tree = self.tree();
        let mut used: Vec<Name> = Vec::new();
        for &property in tree.children(pattern, "properties").iter().flatten() {
            if tree.is(property, kinds::REST_ELEMENT) {
                let argument = self.required_child(property, "argument")?;
                let rest: Fields = match value {
                    Value::Object(fields) => fields
                        .borrow()
                        .iter()
                        .filter(|(key, _)| !used.contains(key))
                        .map(|(key, v)| (key.clone(), v.clone()))
                        .collect(),
                    _ => Fields::default(),
                };
                self.bind_pattern(argument, Value::Object(Local::new(rest)), scope, binding)?;
                continue;
            }
            let key = self.property_key(property, "key", scope)?;
            let target = self.required_child(property, "value")?;
            let item = get_property(value, &key)?;
            used.push(key);
            self.bind_pattern(target, item, scope, binding)?;
        }
        Ok(())
    }
}
