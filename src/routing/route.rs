//! Route types and their declared shape.
//!
//! A route is a plain Rust value describing one endpoint's identity and
//! parameters. Its [`RouteSchema`] is the type-level description the registry
//! binds against; [`Route::fields`] is the instance-level view the resolver
//! serializes; [`Route::from_params`] is the way back from a request.

use std::any::TypeId;
use std::fmt;

use crate::routing::params::{ParamError, RouteParams};

/// One capability tag of a route type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Readable via GET.
    Get,
    /// Mutates via POST.
    Post,
    /// Mutates via PUT.
    Put,
    /// Mutates via DELETE.
    Delete,
    /// Forms targeting this route carry an anti-forgery token.
    Csrf,
    /// Forms targeting this route are submitted as multipart.
    Multipart,
}

impl Capability {
    const ALL: [Capability; 6] = [
        Capability::Get,
        Capability::Post,
        Capability::Put,
        Capability::Delete,
        Capability::Csrf,
        Capability::Multipart,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of capability tags declared by a route type.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl<const N: usize> From<[Capability; N]> for Capabilities {
    fn from(capabilities: [Capability; N]) -> Self {
        capabilities.into_iter().collect()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Whether a field becomes a path segment or a query/form parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Path,
    Query,
}

/// Declared shape of one route field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub role: FieldRole,
    /// Canonical (constructor) position. Defaults to the declaration index.
    pub position: usize,
    /// The field type admits "absent" (`Option<_>`).
    pub optional: bool,
    /// The field has a default value when absent.
    pub has_default: bool,
    /// The field must be present in submitted forms regardless of its type.
    pub force_present: bool,
}

/// Type-level description of a route: name, fields, prefix, capabilities and
/// the optional access predicate.
#[derive(Debug, Clone)]
pub struct RouteSchema {
    pub(crate) name: &'static str,
    pub(crate) prefix: Option<String>,
    pub(crate) capabilities: Capabilities,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) access: Option<&'static str>,
}

impl RouteSchema {
    /// Start a schema named after `R` (last path segment of its type name).
    pub fn of<R: 'static>() -> Self {
        Self::named(short_type_name::<R>())
    }

    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            prefix: None,
            capabilities: Capabilities::empty(),
            fields: Vec::new(),
            access: None,
        }
    }

    /// Use an explicit path prefix instead of deriving one from the name.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn capability(mut self, capability: Capability) -> Self {
        self.capabilities = self.capabilities.with(capability);
        self
    }

    pub fn capabilities(mut self, capabilities: impl Into<Capabilities>) -> Self {
        let capabilities = capabilities.into();
        self.capabilities = capabilities.iter().fold(self.capabilities, Capabilities::with);
        self
    }

    /// Name of the access predicate to resolve from the container.
    pub fn access(mut self, predicate: &'static str) -> Self {
        self.access = Some(predicate);
        self
    }

    /// Declare a path field.
    pub fn path(self, name: &'static str) -> Self {
        self.field(name, FieldRole::Path, false, false)
    }

    /// Declare a required query field (non-optional, no default).
    pub fn query(self, name: &'static str) -> Self {
        self.field(name, FieldRole::Query, false, false)
    }

    /// Declare an optional query field.
    pub fn optional(self, name: &'static str) -> Self {
        self.field(name, FieldRole::Query, true, false)
    }

    /// Declare a query field that falls back to a default value.
    pub fn defaulted(self, name: &'static str) -> Self {
        self.field(name, FieldRole::Query, false, true)
    }

    /// Mark the last declared field as always present in forms.
    pub fn present(mut self) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.force_present = true;
        }
        self
    }

    /// Override the canonical position of the last declared field.
    pub fn position(mut self, position: usize) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.position = position;
        }
        self
    }

    fn field(mut self, name: &'static str, role: FieldRole, optional: bool, has_default: bool) -> Self {
        let position = self.fields.len();
        self.fields.push(FieldSpec {
            name,
            role,
            position,
            optional,
            has_default,
            force_present: false,
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn capability_set(&self) -> Capabilities {
        self.capabilities
    }

    pub fn access_predicate(&self) -> Option<&'static str> {
        self.access
    }
}

/// A typed endpoint description.
pub trait Route: Send + Sync + Sized + 'static {
    /// The declared shape of this route type.
    fn schema() -> RouteSchema;

    /// Current field values, by field name.
    fn fields(&self) -> Vec<(&'static str, FieldValue)>;

    /// Rebuild the route from the parameters of an incoming request.
    fn from_params(params: &RouteParams) -> Result<Self, ParamError>;
}

/// Identity of a route type, as seen in a handler's parameter list.
#[derive(Clone, Copy)]
pub struct RouteDescriptor {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub schema: fn() -> RouteSchema,
}

impl RouteDescriptor {
    pub fn of<R: Route>() -> Self {
        Self {
            type_id: TypeId::of::<R>(),
            type_name: std::any::type_name::<R>(),
            schema: R::schema,
        }
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RouteDescriptor").field(&self.type_name).finish()
    }
}

/// Renderable value of one route field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Scalar(String),
    List(Vec<String>),
}

/// Conversion of a field's Rust value into a [`FieldValue`].
pub trait ToFieldValue {
    fn to_field(&self) -> FieldValue;
}

macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToFieldValue for $ty {
                fn to_field(&self) -> FieldValue {
                    FieldValue::Scalar(self.to_string())
                }
            }
        )*
    };
}

scalar_field!(
    String, str, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
    f32, f64, uuid::Uuid,
);

impl<T: ToFieldValue + ?Sized> ToFieldValue for &T {
    fn to_field(&self) -> FieldValue {
        (**self).to_field()
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field(&self) -> FieldValue {
        match self {
            Some(value) => value.to_field(),
            None => FieldValue::Null,
        }
    }
}

impl<T: ToFieldValue> ToFieldValue for [T] {
    fn to_field(&self) -> FieldValue {
        let mut items = Vec::with_capacity(self.len());
        for item in self {
            match item.to_field() {
                FieldValue::Null => {}
                FieldValue::Scalar(s) => items.push(s),
                FieldValue::List(nested) => items.extend(nested),
            }
        }
        FieldValue::List(items)
    }
}

impl<T: ToFieldValue> ToFieldValue for Vec<T> {
    fn to_field(&self) -> FieldValue {
        self.as_slice().to_field()
    }
}

/// Last path segment of a type name, without generic arguments.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ShowUserRoute;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<ShowUserRoute>(), "ShowUserRoute");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }

    #[test]
    fn test_capabilities_set() {
        let caps = Capabilities::from([Capability::Get, Capability::Post, Capability::Csrf]);
        assert!(caps.contains(Capability::Get));
        assert!(caps.contains(Capability::Csrf));
        assert!(!caps.contains(Capability::Delete));
        assert_eq!(
            caps.iter().collect::<Vec<_>>(),
            vec![Capability::Get, Capability::Post, Capability::Csrf]
        );
    }

    #[test]
    fn test_schema_builder_markers() {
        let schema = RouteSchema::of::<ShowUserRoute>()
            .capability(Capability::Get)
            .query("b")
            .path("a")
            .position(0)
            .optional("c")
            .present()
            .defaulted("d");

        assert_eq!(schema.name(), "ShowUserRoute");
        let fields = schema.fields();
        assert_eq!(fields[0].position, 0);
        assert_eq!(fields[1].role, FieldRole::Path);
        assert_eq!(fields[1].position, 0);
        assert!(fields[2].optional && fields[2].force_present);
        assert!(fields[3].has_default);
    }

    #[test]
    fn test_field_values() {
        assert_eq!(123i32.to_field(), FieldValue::Scalar("123".into()));
        assert_eq!(None::<i32>.to_field(), FieldValue::Null);
        assert_eq!(
            vec![Some(1i32), None, Some(3)].to_field(),
            FieldValue::List(vec!["1".into(), "3".into()])
        );
        assert_eq!(Vec::<i32>::new().to_field(), FieldValue::List(vec![]));
        assert_eq!("x".to_field(), FieldValue::Scalar("x".into()));
    }
}
