//! RPC proxy loader synthesis.
//!
//! For every remote interface the loader declares a local proxy class and
//! registers a provider for it:
//!
//! ```text
//! public class RpcProxyLoaderImpl implements RpcProxyLoader {
//!     public void loadProxies(final MessageBus bus) {
//!         class com_example_FooImpl implements com.example.Foo, RpcStub { ... }
//!         RemoteServiceProxyFactory.addRemoteProxy(com.example.Foo.class, new ProxyProvider() {
//!             public Object getProxy() { return new com_example_FooImpl(); }
//!         });
//!     }
//! }
//! ```

use crate::ast::{ClassDecl, CompilationUnit, Expr, FieldDecl, MethodDecl, Param, Stmt, TypeRef};
use crate::context::SynthesisContext;
use crate::jvm_types::map_java_type;
use crate::naming::{proxy_class_name, rpc_subject, setter_name};
use crate::render::{render_stmt, render_unit};
use busgen_core::{ClassName, GeneratedArtifact, MethodDescriptor, SynthesisError, TypeDescriptor};
use std::collections::HashSet;

const REMOTE_CALLBACK: &str = "remoteCallback";
const ERROR_CALLBACK: &str = "errorCallback";
const QUALIFIERS: &str = "qualifiers";
const QUALIFIERS_TYPE: &str = "java.lang.annotation.Annotation[]";

/// Build the local proxy class for one remote interface.
pub fn proxy_class(interface: &TypeDescriptor, ctx: &SynthesisContext) -> ClassDecl {
    let stub_fields = [
        (REMOTE_CALLBACK, ctx.bus.remote_callback.as_str()),
        (ERROR_CALLBACK, ctx.bus.error_callback.as_str()),
        (QUALIFIERS, QUALIFIERS_TYPE),
    ];

    let mut class = ClassDecl::new(proxy_class_name(interface.name()))
        .implementing(interface.source_name().as_str())
        .implementing(ctx.bus.rpc_stub.as_str());
    for (name, ty) in stub_fields {
        class = class.with_field(FieldDecl::private(ty, name));
    }
    for (name, ty) in stub_fields {
        class = class.with_method(
            MethodDecl::overriding(TypeRef::void(), setter_name(name))
                .with_param(Param::final_(ty, name))
                .with_body(vec![Stmt::assign(Expr::This.field(name), Expr::var(name))]),
        );
    }
    for method in interface.methods() {
        class = class.with_method(proxy_method(interface, method, ctx));
    }
    class
}

/// Forward one interface method over the bus.
///
/// Parameters are renamed `a0, a1, ...` so they can never shadow the stub
/// fields or the captured bus variable.
fn proxy_method(interface: &TypeDescriptor, method: &MethodDescriptor, ctx: &SynthesisContext) -> MethodDecl {
    let jvm = map_java_type(method.return_type());
    let mut decl = MethodDecl::overriding(method.return_type(), method.name());
    let mut args = Vec::with_capacity(method.parameters().len());
    for (index, parameter) in method.parameters().iter().enumerate() {
        let name = format!("a{index}");
        decl = decl.with_param(Param::final_(parameter.ty(), name.as_str()));
        args.push(Expr::var(name));
    }

    let send = Expr::static_call(ctx.bus.message_builder.as_str(), "createCall", vec![])
        .call("call", vec![Expr::str(rpc_subject(interface.name()))])
        .call(
            "endpoint",
            vec![
                Expr::str(method.typed_endpoint()),
                Expr::var(QUALIFIERS),
                Expr::NewArray {
                    element: TypeRef::new("java.lang.Object"),
                    items: args,
                },
            ],
        )
        .call(
            "respondTo",
            vec![Expr::class_lit(jvm.boxed.as_str()), Expr::var(REMOTE_CALLBACK)],
        )
        .call("errorsHandledBy", vec![Expr::var(ERROR_CALLBACK)])
        .call("sendNowWith", vec![Expr::var(ctx.bus_var.as_str())]);

    decl.push(Stmt::expr(send));
    if let Some(default) = jvm.default_value() {
        decl.push(Stmt::ret(default));
    }
    decl
}

/// Register a provider that instantiates the proxy for `interface`.
pub fn registration(interface: &TypeDescriptor, ctx: &SynthesisContext) -> Stmt {
    let get_proxy = MethodDecl::overriding("java.lang.Object", "getProxy").with_body(vec![
        Stmt::ret(Expr::new_instance(proxy_class_name(interface.name()).as_str(), vec![])),
    ]);
    let provider = Expr::Anonymous {
        ty: TypeRef::new(ctx.bus.proxy_provider.as_str()),
        methods: vec![get_proxy],
    };
    Stmt::expr(Expr::static_call(
        ctx.bus.remote_proxy_factory.as_str(),
        "addRemoteProxy",
        vec![Expr::class_lit(interface.source_name().as_str()), provider],
    ))
}

/// Build the loader class registering a proxy for every interface.
///
/// Interfaces are registered in the given order. A repeated interface is
/// registered once and non-interfaces are skipped. A synthesis error names the
/// interface that caused it.
pub fn synthesize_loader(
    class_name: &ClassName,
    interfaces: &[TypeDescriptor],
    ctx: &SynthesisContext,
) -> Result<CompilationUnit, SynthesisError> {
    let mut load = MethodDecl::public(TypeRef::void(), "loadProxies").with_param(Param::final_(
        ctx.bus.message_bus.as_str(),
        ctx.bus_var.as_str(),
    ));

    let mut seen = HashSet::new();
    for interface in interfaces {
        if !interface.is_interface() {
            tracing::warn!(type_name = %interface.name(), "Skipping non-interface in proxy loader");
            continue;
        }
        if !seen.insert(interface.name()) {
            continue;
        }
        let proxy = Stmt::LocalClass(proxy_class(interface, ctx));
        let register = registration(interface, ctx);
        render_stmt(&proxy, interface.name())?;
        render_stmt(&register, interface.name())?;
        load.push(proxy);
        load.push(register);
    }

    let class = ClassDecl::public(class_name.simple_name())
        .implementing(ctx.loader_contract.as_str())
        .with_method(load);
    Ok(CompilationUnit::new(class_name.package(), class))
}

/// Synthesize and render the loader.
pub fn generate_loader(
    class_name: &ClassName,
    interfaces: &[TypeDescriptor],
    ctx: &SynthesisContext,
) -> Result<GeneratedArtifact, SynthesisError> {
    let unit = synthesize_loader(class_name, interfaces, ctx)?;
    let source = render_unit(&unit, &ctx.loader_contract)?;
    tracing::debug!(
        class = %class_name,
        proxies = interfaces.len(),
        "Synthesized proxy loader"
    );
    Ok(GeneratedArtifact::new(class_name.clone(), source))
}

#[cfg(test)]
#[path = "proxy/proxy_tests.rs"]
mod proxy_tests;
