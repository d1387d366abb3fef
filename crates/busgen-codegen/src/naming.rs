//! Naming convention utilities for generated code.
//!
//! # Supported Conversions
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `remoteCallback` | [`setter_name`] | `setRemoteCallback` |
//! | `com.example.Foo` | [`proxy_class_name`] | `com_example_FooImpl` |
//! | `com.example.Event` | [`subject_name`] | `cdi.event:com.example.Event` |
//! | `com.example.Foo` | [`rpc_subject`] | `com.example.Foo:RPC` |

/// Capitalize the first letter of a string.
///
/// # Examples
///
/// ```
/// use busgen_codegen::naming::capitalize;
///
/// assert_eq!(capitalize("hello"), "Hello");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Name of the setter for a bean-style property.
pub fn setter_name(property: &str) -> String {
    format!("set{}", capitalize(property))
}

/// Local class name of the proxy generated for `interface`.
///
/// Package dots and nested-type `$` both become underscores, so proxies for
/// interfaces with equal simple names never collide inside one loader.
///
/// # Examples
///
/// ```
/// use busgen_codegen::naming::proxy_class_name;
///
/// assert_eq!(proxy_class_name("com.example.Foo"), "com_example_FooImpl");
/// assert_eq!(proxy_class_name("com.example.Outer$Api"), "com_example_Outer_ApiImpl");
/// ```
pub fn proxy_class_name(interface: &str) -> String {
    format!("{}Impl", interface.replace(['.', '$'], "_"))
}

/// Bus subject that carries RPC calls for `interface`.
pub fn rpc_subject(interface: &str) -> String {
    format!("{interface}:RPC")
}

/// Bus subject that carries events of type `event_type`.
pub fn subject_name(prefix: &str, event_type: &str) -> String {
    format!("{prefix}{event_type}")
}
