#![allow(non_snake_case)]

use super::*;
use test_case::test_case;
use busgen_core::{ModelBuilder, RawMethod, RawParameter, RawType, Strategy};

fn model(raw: RawType) -> TypeDescriptor {
    let strategy = if raw.is_interface() {
        Strategy::RpcProxy
    } else {
        Strategy::ObserverSubscription
    };
    ModelBuilder::new().build(&raw, strategy).unwrap()
}

fn foo() -> TypeDescriptor {
    model(RawType::interface("com.example.Foo").with_method(
        RawMethod::new("bar")
            .returning("java.lang.String")
            .with_parameter(RawParameter::new("message", "java.lang.String")),
    ))
}

/// Replace a declared type after modeling, bypassing the builder's checks
fn with_declared_type(descriptor: TypeDescriptor, pointer: &str, ty: &str) -> TypeDescriptor {
    let mut value = serde_json::to_value(&descriptor).unwrap();
    *value.pointer_mut(pointer).unwrap() = serde_json::json!(ty);
    serde_json::from_value(value).unwrap()
}

fn loader_name() -> ClassName {
    ClassName::parse("org.busgen.client.framework.RpcProxyLoaderImpl")
}

fn registered_interfaces(unit: &CompilationUnit) -> Vec<String> {
    unit.types[0].methods[0]
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Expr(Expr::StaticCall { method, args, .. }) if method == "addRemoteProxy" => {
                match &args[0] {
                    Expr::ClassLit(ty) => Some(ty.name().to_string()),
                    _ => None,
                }
            }
            _ => None,
        })
        .collect()
}

#[test]
fn synthesize_loader___single_interface___registers_one_provider() {
    let ctx = SynthesisContext::default();

    let unit = synthesize_loader(&loader_name(), &[foo()], &ctx).unwrap();

    let class = &unit.types[0];
    assert_eq!(class.name, "RpcProxyLoaderImpl");
    assert_eq!(class.implements[0].name(), "org.busgen.client.framework.RpcProxyLoader");
    assert_eq!(class.methods.len(), 1);
    assert_eq!(class.methods[0].name, "loadProxies");
    assert_eq!(registered_interfaces(&unit), vec!["com.example.Foo"]);
}

#[test]
fn proxy_class___implements_interface_and_stub() {
    let class = proxy_class(&foo(), &SynthesisContext::default());

    assert_eq!(class.name, "com_example_FooImpl");
    let implemented: Vec<_> = class.implements.iter().map(TypeRef::name).collect();
    assert_eq!(
        implemented,
        vec!["com.example.Foo", "org.busgen.client.framework.RpcStub"]
    );
    let methods: Vec<_> = class.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        methods,
        vec!["setRemoteCallback", "setErrorCallback", "setQualifiers", "bar"]
    );
}

#[test]
fn generate_loader___proxy_method_delegates_to_bus() {
    let artifact = generate_loader(&loader_name(), &[foo()], &SynthesisContext::default()).unwrap();
    let source = artifact.source();

    assert!(source.contains("public java.lang.String bar(final java.lang.String a0) {"));
    assert!(source.contains(
        "org.busgen.client.MessageBuilder.createCall().call(\"com.example.Foo:RPC\")\
         .endpoint(\"bar:java.lang.String:\", qualifiers, new java.lang.Object[] { a0 })\
         .respondTo(java.lang.String.class, remoteCallback)\
         .errorsHandledBy(errorCallback).sendNowWith(bus);"
    ));
    assert!(source.contains("return null;"));
    assert!(source.contains(
        "org.busgen.client.framework.RemoteServiceProxyFactory.addRemoteProxy(com.example.Foo.class, \
         new org.busgen.client.framework.ProxyProvider() {"
    ));
    assert!(source.contains("return new com_example_FooImpl();"));
    assert_eq!(artifact.class_name(), &loader_name());
}

#[test]
fn generate_loader___void_and_primitive_returns() {
    let api = model(
        RawType::interface("com.example.Api")
            .with_method(RawMethod::new("fire"))
            .with_method(RawMethod::new("count").returning("int")),
    );

    let source = generate_loader(&loader_name(), &[api], &SynthesisContext::default())
        .unwrap()
        .source()
        .to_string();

    assert!(source.contains(".endpoint(\"fire:\", qualifiers, new java.lang.Object[] {})"));
    assert!(source.contains(".respondTo(java.lang.Void.class, remoteCallback)"));
    assert!(source.contains(".respondTo(java.lang.Integer.class, remoteCallback)"));
    assert!(source.contains("return 0;"));
}

#[test]
fn synthesize_loader___keeps_order_and_registers_each_once() {
    let a = model(RawType::interface("com.example.A"));
    let b = model(RawType::interface("com.example.B"));

    let unit = synthesize_loader(
        &loader_name(),
        &[b.clone(), a.clone(), b],
        &SynthesisContext::default(),
    )
    .unwrap();

    assert_eq!(registered_interfaces(&unit), vec!["com.example.B", "com.example.A"]);
}

#[test]
fn synthesize_loader___skips_non_interfaces() {
    let class = model(RawType::class("com.example.Impl"));

    let unit = synthesize_loader(&loader_name(), &[class, foo()], &SynthesisContext::default())
        .unwrap();

    assert_eq!(registered_interfaces(&unit), vec!["com.example.Foo"]);
}

#[test]
fn synthesize_loader___nested_interface___uses_source_name() {
    let nested = model(RawType::interface("com.example.Outer$Api"));

    let unit = synthesize_loader(&loader_name(), &[nested], &SynthesisContext::default()).unwrap();

    assert_eq!(registered_interfaces(&unit), vec!["com.example.Outer.Api"]);
}

#[test]
fn synthesize_loader___invalid_parameter_type___error_names_interface() {
    let broken = with_declared_type(
        model(RawType::interface("com.example.Broken").with_method(
            RawMethod::new("send").with_parameter(RawParameter::new("value", "java.util.List<String>")),
        )),
        "/methods/0/parameters/0/ty",
        "java.util.List<class>",
    );

    let err = synthesize_loader(&loader_name(), &[foo(), broken], &SynthesisContext::default())
        .unwrap_err();

    assert!(matches!(
        err,
        SynthesisError::InvalidIdentifier { type_name, .. } if type_name == "com.example.Broken"
    ));
}

#[test]
fn generate_loader___no_interfaces___empty_load_method() {
    let artifact = generate_loader(&loader_name(), &[], &SynthesisContext::default()).unwrap();

    assert!(artifact.source().contains(
        "public void loadProxies(final org.busgen.client.MessageBus bus) {\n    }"
    ));
}

#[test_case("/methods/0/parameters/0/ty", "java.util.List<String" ; "unbalanced generics")]
#[test_case("/methods/0/return_type", "java.lang String" ; "embedded whitespace")]
#[test_case("/methods/0/parameters/0/ty", "String[]x" ; "name after brackets")]
fn synthesize_loader___malformed_declared_type___rejected(pointer: &str, ty: &str) {
    let broken = with_declared_type(foo(), pointer, ty);

    let err = synthesize_loader(&loader_name(), &[broken], &SynthesisContext::default())
        .unwrap_err();

    assert!(matches!(
        err,
        SynthesisError::InvalidIdentifier { type_name, .. } if type_name == "com.example.Foo"
    ));
}

#[test]
fn generate_loader___nested_types___source_names_in_code() {
    let api = model(RawType::interface("com.example.Api").with_method(
        RawMethod::new("send")
            .returning("com.example.Outer$Reply")
            .with_parameter(RawParameter::new("request", "com.example.Outer$Request")),
    ));

    let source = generate_loader(&loader_name(), &[api], &SynthesisContext::default())
        .unwrap()
        .source()
        .to_string();

    assert!(source.contains(
        "public com.example.Outer.Reply send(final com.example.Outer.Request a0) {"
    ));
    assert!(source.contains(".respondTo(com.example.Outer.Reply.class, remoteCallback)"));
    assert!(source.contains(".endpoint(\"send:com.example.Outer$Request:\""));
}
