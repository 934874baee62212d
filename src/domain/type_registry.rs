//! Type Registry - explicit constructor signatures for every type the engine may build
//!
//! Rust has no runtime reflection, so the metadata the resolver walks is registered
//! up front: each type declares its kind, its constructors (ordered parameter types
//! plus an invoker closure), and, for interfaces, a proxy factory used by the mock
//! provider.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use serde::Serialize;

use crate::domain::mock::MockControl;
use crate::domain::ports::TypeMetadata;

/// A live value produced by the resolver. Shared dependencies hand out clones of the
/// same `Arc`.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Invokes a registered constructor with already-resolved arguments.
pub type ConstructFn = Arc<dyn Fn(&Args) -> Result<Instance> + Send + Sync>;

/// Produces the default value of a value-like type.
pub type DefaultFn = Arc<dyn Fn() -> Instance + Send + Sync>;

/// Builds the implementation object of an interface around its control handle.
pub type ProxyFactory = Arc<dyn Fn(MockControl) -> Result<Instance> + Send + Sync>;

/// Opaque handle to a registered (or referenced) type. Identity is the `TypeId`.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type path as reported by the compiler.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type kind - what the host type system knows about a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Primitive,
    String,
    Enum,
    /// Plain value type (struct-like, copied by value)
    Value,
    /// Trait object; no concrete fields, always mocked
    Interface,
    Class,
}

impl TypeKind {
    /// Primitive, string, enum and other value types all resolve to a default value.
    pub fn is_value_like(&self) -> bool {
        matches!(
            self,
            TypeKind::Primitive | TypeKind::String | TypeKind::Enum | TypeKind::Value
        )
    }
}

/// Visibility level of a constructor. Every level is discoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// One constructor of a registered type
#[derive(Clone)]
pub struct ConstructorInfo {
    pub params: Arc<[TypeDescriptor]>,
    pub visibility: Visibility,
    invoke: ConstructFn,
}

impl ConstructorInfo {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn invoke(&self, args: &Args) -> Result<Instance> {
        (self.invoke)(args)
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("params", &self.params)
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// Type information stored in the registry
#[derive(Clone)]
pub struct TypeInfo {
    pub descriptor: TypeDescriptor,
    pub kind: TypeKind,
    /// Declaration order is significant: it breaks ties in constructor selection.
    pub constructors: Vec<ConstructorInfo>,
    pub default_value: Option<DefaultFn>,
    pub proxy: Option<ProxyFactory>,
}

impl TypeInfo {
    fn new(descriptor: TypeDescriptor, kind: TypeKind) -> Self {
        Self {
            descriptor,
            kind,
            constructors: Vec::new(),
            default_value: None,
            proxy: None,
        }
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("descriptor", &self.descriptor)
            .field("kind", &self.kind)
            .field("constructors", &self.constructors)
            .field("has_default", &self.default_value.is_some())
            .field("has_proxy", &self.proxy.is_some())
            .finish()
    }
}

/// Resolved constructor arguments, in parameter order.
///
/// `None` slots hold absent defaults (value types registered without a default).
pub struct Args {
    owner: TypeDescriptor,
    values: Vec<Option<Instance>>,
}

impl Args {
    pub fn new(owner: TypeDescriptor, values: Vec<Option<Instance>>) -> Self {
        Self { owner, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn slot(&self, index: usize) -> Result<Option<&Instance>> {
        self.values.get(index).map(Option::as_ref).ok_or_else(|| {
            anyhow!(
                "{} constructor has no argument at position {}",
                self.owner,
                index
            )
        })
    }

    fn present(&self, index: usize) -> Result<&Instance> {
        self.slot(index)?.ok_or_else(|| {
            anyhow!(
                "argument {} of {} constructor is absent",
                index,
                self.owner
            )
        })
    }

    /// Shared reference to a concrete argument.
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        let instance = self.present(index)?.clone();
        instance.downcast::<T>().map_err(|_| {
            anyhow!(
                "argument {} of {} constructor is not a {}",
                index,
                self.owner,
                std::any::type_name::<T>()
            )
        })
    }

    /// Owned copy of a value argument.
    pub fn value<T: Any + Send + Sync + Clone>(&self, index: usize) -> Result<T> {
        self.get::<T>(index).map(|v| v.as_ref().clone())
    }

    /// Implementation of an interface argument.
    pub fn service<I: ?Sized + Send + Sync + 'static>(&self, index: usize) -> Result<Arc<I>> {
        self.present(index)?
            .downcast_ref::<Arc<I>>()
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "argument {} of {} constructor does not implement {}",
                    index,
                    self.owner,
                    std::any::type_name::<I>()
                )
            })
    }

    /// Concrete argument that may have resolved to an absent default.
    pub fn optional<T: Any + Send + Sync>(&self, index: usize) -> Result<Option<Arc<T>>> {
        match self.slot(index)? {
            Some(_) => self.get::<T>(index).map(Some),
            None => Ok(None),
        }
    }
}

/// Type Registry - stores all type definitions
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<TypeId, TypeInfo>,
}

impl TypeRegistry {
    /// Create a new empty type registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the primitive and string types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_primitive::<bool>();
        registry.register_primitive::<char>();
        registry.register_primitive::<i8>();
        registry.register_primitive::<i16>();
        registry.register_primitive::<i32>();
        registry.register_primitive::<i64>();
        registry.register_primitive::<i128>();
        registry.register_primitive::<isize>();
        registry.register_primitive::<u8>();
        registry.register_primitive::<u16>();
        registry.register_primitive::<u32>();
        registry.register_primitive::<u64>();
        registry.register_primitive::<u128>();
        registry.register_primitive::<usize>();
        registry.register_primitive::<f32>();
        registry.register_primitive::<f64>();
        registry.insert_with_default::<String>(TypeKind::String);
        registry.insert_with_default::<&'static str>(TypeKind::String);
        registry
    }

    fn insert_with_default<T: Any + Send + Sync + Default>(&mut self, kind: TypeKind) {
        let mut info = TypeInfo::new(TypeDescriptor::of::<T>(), kind);
        info.default_value = Some(Arc::new(|| Arc::new(T::default()) as Instance));
        self.register(info);
    }

    /// Register a new type, replacing any earlier registration of it
    pub fn register(&mut self, info: TypeInfo) {
        self.types.insert(info.descriptor.id(), info);
    }

    pub fn register_primitive<T: Any + Send + Sync + Default>(&mut self) {
        self.insert_with_default::<T>(TypeKind::Primitive);
    }

    /// Value type whose default is `T::default()`.
    pub fn register_value<T: Any + Send + Sync + Default>(&mut self) {
        self.insert_with_default::<T>(TypeKind::Value);
    }

    /// Value type with no known default; resolves to an absent argument.
    pub fn register_opaque_value<T: ?Sized + 'static>(&mut self) {
        self.register(TypeInfo::new(TypeDescriptor::of::<T>(), TypeKind::Value));
    }

    /// Enum registered with its members in declaration order. The first member is the default.
    pub fn register_enum<E: Any + Send + Sync + Clone>(&mut self, members: Vec<E>) -> Result<()> {
        let Some(first) = members.into_iter().next() else {
            bail!("enum {} registered without members", std::any::type_name::<E>());
        };
        let mut info = TypeInfo::new(TypeDescriptor::of::<E>(), TypeKind::Enum);
        info.default_value = Some(Arc::new(move || Arc::new(first.clone()) as Instance));
        self.register(info);
        Ok(())
    }

    /// Interface (trait object) with the factory that wraps a control handle into an
    /// implementation.
    pub fn register_interface<I, F>(&mut self, proxy: F)
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(MockControl) -> Arc<I> + Send + Sync + 'static,
    {
        let mut info = TypeInfo::new(TypeDescriptor::of::<I>(), TypeKind::Interface);
        info.proxy = Some(Arc::new(move |control| Ok(Arc::new(proxy(control)) as Instance)));
        self.register(info);
    }

    /// Class with a single zero-argument constructor calling `T::default()`.
    pub fn register_default<T: Any + Send + Sync + Default>(&mut self) {
        self.register_class::<T>()
            .constructor(Vec::new(), |_| Ok(T::default()));
    }

    /// Start registering a class; constructors are added in declaration order.
    pub fn register_class<T: Any + Send + Sync>(&mut self) -> ClassBuilder<'_, T> {
        let descriptor = TypeDescriptor::of::<T>();
        let entry = self
            .types
            .entry(descriptor.id())
            .or_insert_with(|| TypeInfo::new(descriptor, TypeKind::Class));
        entry.kind = TypeKind::Class;
        ClassBuilder {
            info: entry,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get type information by descriptor
    pub fn get(&self, descriptor: &TypeDescriptor) -> Option<&TypeInfo> {
        self.types.get(&descriptor.id())
    }

    /// Check if a type exists in the registry
    pub fn contains(&self, descriptor: &TypeDescriptor) -> bool {
        self.types.contains_key(&descriptor.id())
    }

    /// All registered descriptors, sorted by name for stable output
    pub fn descriptors(&self) -> Vec<TypeDescriptor> {
        let mut all: Vec<TypeDescriptor> = self.types.values().map(|t| t.descriptor).collect();
        all.sort_by_key(|d| d.name());
        all
    }

    /// Get count of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeMetadata for TypeRegistry {
    fn type_info(&self, descriptor: &TypeDescriptor) -> Option<&TypeInfo> {
        self.get(descriptor)
    }
}

/// Adds constructors to a class registration
pub struct ClassBuilder<'a, T> {
    info: &'a mut TypeInfo,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> ClassBuilder<'_, T> {
    pub fn constructor<F>(self, params: Vec<TypeDescriptor>, f: F) -> Self
    where
        F: Fn(&Args) -> Result<T> + Send + Sync + 'static,
    {
        self.with_visibility(Visibility::Public, params, f)
    }

    pub fn protected_constructor<F>(self, params: Vec<TypeDescriptor>, f: F) -> Self
    where
        F: Fn(&Args) -> Result<T> + Send + Sync + 'static,
    {
        self.with_visibility(Visibility::Protected, params, f)
    }

    pub fn private_constructor<F>(self, params: Vec<TypeDescriptor>, f: F) -> Self
    where
        F: Fn(&Args) -> Result<T> + Send + Sync + 'static,
    {
        self.with_visibility(Visibility::Private, params, f)
    }

    fn with_visibility<F>(self, visibility: Visibility, params: Vec<TypeDescriptor>, f: F) -> Self
    where
        F: Fn(&Args) -> Result<T> + Send + Sync + 'static,
    {
        self.info.constructors.push(ConstructorInfo {
            params: params.into(),
            visibility,
            invoke: Arc::new(move |args: &Args| f(args).map(|v| Arc::new(v) as Instance)),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Level {
        Info,
        Debug,
    }

    struct Widget {
        size: i32,
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = TypeRegistry::with_builtins();
        registry
            .register_class::<Widget>()
            .constructor(vec![TypeDescriptor::of::<i32>()], |a| {
                Ok(Widget { size: a.value(0)? })
            });

        let info = registry.get(&TypeDescriptor::of::<Widget>()).unwrap();
        assert_eq!(info.kind, TypeKind::Class);
        assert_eq!(info.constructors.len(), 1);
        assert_eq!(info.constructors[0].arity(), 1);
    }

    #[test]
    fn test_contains() {
        let registry = TypeRegistry::with_builtins();
        assert!(registry.contains(&TypeDescriptor::of::<String>()));
        assert!(!registry.contains(&TypeDescriptor::of::<Widget>()));
    }

    #[test]
    fn test_enum_default_is_first_member() {
        let mut registry = TypeRegistry::new();
        registry
            .register_enum(vec![Level::Debug, Level::Info])
            .unwrap();
        let info = registry.get(&TypeDescriptor::of::<Level>()).unwrap();
        let value = (info.default_value.as_ref().unwrap())();
        assert_eq!(value.downcast_ref::<Level>(), Some(&Level::Debug));
    }

    #[test]
    fn test_enum_without_members_is_rejected() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register_enum::<Level>(Vec::new()).is_err());
    }

    #[test]
    fn test_constructor_invocation_through_args() {
        let mut registry = TypeRegistry::with_builtins();
        registry
            .register_class::<Widget>()
            .constructor(vec![TypeDescriptor::of::<i32>()], |a| {
                Ok(Widget { size: a.value(0)? })
            });
        let info = registry.get(&TypeDescriptor::of::<Widget>()).unwrap();
        let args = Args::new(
            TypeDescriptor::of::<Widget>(),
            vec![Some(Arc::new(7_i32) as Instance)],
        );
        let widget = info.constructors[0].invoke(&args).unwrap();
        assert_eq!(widget.downcast_ref::<Widget>().unwrap().size, 7);
    }

    #[test]
    fn test_args_report_wrong_type_and_absent_slots() {
        let owner = TypeDescriptor::of::<Widget>();
        let args = Args::new(owner, vec![Some(Arc::new(1_u8) as Instance), None]);
        assert!(args.get::<String>(0).is_err());
        assert!(args.get::<u8>(1).is_err());
        assert!(args.optional::<u8>(1).unwrap().is_none());
        assert!(args.get::<u8>(5).is_err());
    }

    #[test]
    fn test_descriptor_identity_is_type_id() {
        assert_eq!(TypeDescriptor::of::<i32>(), TypeDescriptor::of::<i32>());
        assert_ne!(TypeDescriptor::of::<i32>(), TypeDescriptor::of::<u32>());
        assert!(TypeDescriptor::of::<String>().name().ends_with("String"));
    }
}
