//! Event observer subscription synthesis.
//!
//! Each observer parameter becomes one `subscribe` call whose callback checks
//! the message qualifiers against the parameter's own set before invoking the
//! bean method. A message with other qualifiers is ignored by this callback;
//! other subscribers on the same subject still see it.

use crate::ast::{ClassDecl, CompilationUnit, Expr, MethodDecl, Modifier, Param, Stmt, TypeRef};
use crate::context::SynthesisContext;
use crate::dispatch::{DecoratorRegistry, InjectionPoint};
use crate::jvm_types::map_java_type;
use crate::naming::subject_name;
use crate::render::render_unit;
use busgen_core::{ClassName, GeneratedArtifact, SynthesisError, TypeDescriptor};

const MESSAGE: &str = "message";
const METHOD_QUALIFIERS: &str = "methodQualifiers";
const QUALIFIERS: &str = "qualifiers";
const RESPONSE: &str = "response";
const STRING_SET: &str = "java.util.Set<String>";

/// Decorator for the observes annotation.
///
/// The observer method must take exactly one parameter, and that parameter
/// must carry the observes annotation.
pub fn observes_decorator(point: &InjectionPoint<'_>, ctx: &SynthesisContext) -> Result<Stmt, SynthesisError> {
    let invalid = |reason: String| SynthesisError::InvalidObserver {
        type_name: point.bean.name().to_string(),
        method: point.method.name().to_string(),
        reason,
    };
    let count = point.method.parameters().len();
    if count != 1 {
        return Err(invalid(format!(
            "observer methods take exactly one parameter, found {count}"
        )));
    }
    if !point.parameter.has_annotation(&ctx.annotations.observes) {
        return Err(invalid(format!(
            "parameter '{}' is not annotated @{}",
            point.parameter.name(),
            ctx.annotations.observes
        )));
    }

    let event_type = point.parameter.ty();
    let payload_class = map_java_type(event_type).boxed;
    let protocol = ctx.bus.protocol.as_str();
    let subscribe = if point.method.has_annotation(&ctx.annotations.local) {
        "subscribeLocal"
    } else {
        "subscribe"
    };

    let mut body = vec![Stmt::final_local(
        STRING_SET,
        METHOD_QUALIFIERS,
        Expr::new_instance("java.util.HashSet<String>", vec![]),
    )];
    for name in point.parameter.qualifiers().names() {
        body.push(Stmt::expr(
            Expr::var(METHOD_QUALIFIERS).call("add", vec![Expr::str(name)]),
        ));
    }
    body.push(Stmt::final_local(
        STRING_SET,
        QUALIFIERS,
        Expr::var(MESSAGE).call(
            "get",
            vec![
                Expr::class_lit("java.util.Set"),
                Expr::static_field(protocol, "QUALIFIERS"),
            ],
        ),
    ));

    let matches = Expr::var(METHOD_QUALIFIERS)
        .call("equals", vec![Expr::var(QUALIFIERS)])
        .or(Expr::var(QUALIFIERS)
            .eq_to(Expr::Null)
            .and(Expr::var(METHOD_QUALIFIERS).call("isEmpty", vec![])));
    body.push(Stmt::if_(
        matches,
        vec![
            Stmt::final_local(
                "java.lang.Object",
                RESPONSE,
                Expr::var(MESSAGE).call(
                    "get",
                    vec![
                        Expr::class_lit(payload_class.as_str()),
                        Expr::static_field(protocol, "OBJECT_REF"),
                    ],
                ),
            ),
            Stmt::expr(Expr::var(ctx.instance_var.as_str()).call(
                point.method.name(),
                vec![Expr::cast(event_type, Expr::var(RESPONSE))],
            )),
        ],
    ));

    let callback = MethodDecl::overriding(TypeRef::void(), "callback")
        .with_param(Param::final_(ctx.bus.message.as_str(), MESSAGE))
        .with_body(body);
    let subject = subject_name(&ctx.bus.subject_prefix, &event_type.erasure());

    Ok(Stmt::expr(Expr::var(ctx.bus_var.as_str()).call(
        subscribe,
        vec![
            Expr::str(subject),
            Expr::Anonymous {
                ty: TypeRef::new(ctx.bus.message_callback.as_str()),
                methods: vec![callback],
            },
        ],
    )))
}

/// Build the subscription class for one observer bean.
///
/// The class has a single `public static void subscribe(bus, instance)`
/// holding one statement per injection point found by `registry`.
pub fn synthesize_observer_class(
    class_name: &ClassName,
    bean: &TypeDescriptor,
    registry: &DecoratorRegistry,
    ctx: &SynthesisContext,
) -> Result<CompilationUnit, SynthesisError> {
    let mut subscribe = MethodDecl::public(TypeRef::void(), "subscribe")
        .with_modifier(Modifier::Static)
        .with_param(Param::final_(ctx.bus.message_bus.as_str(), ctx.bus_var.as_str()))
        .with_param(Param::final_(bean.source_name().as_str(), ctx.instance_var.as_str()));

    for point in registry.injection_points(bean) {
        subscribe.push(registry.decorate(&point, ctx)?);
    }

    let class = ClassDecl::public(class_name.simple_name()).with_method(subscribe);
    Ok(CompilationUnit::new(class_name.package(), class))
}

/// Synthesize and render the subscription class for `bean`.
pub fn generate_observer(
    class_name: &ClassName,
    bean: &TypeDescriptor,
    registry: &DecoratorRegistry,
    ctx: &SynthesisContext,
) -> Result<GeneratedArtifact, SynthesisError> {
    let unit = synthesize_observer_class(class_name, bean, registry, ctx)?;
    let source = render_unit(&unit, bean.name())?;
    tracing::debug!(class = %class_name, bean = %bean.name(), "Synthesized observer subscriptions");
    Ok(GeneratedArtifact::new(class_name.clone(), source))
}
