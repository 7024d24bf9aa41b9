//! Unit tests for the JDL grammar
//!
//! These tests run whole sources through the lexer and the parser and check
//! the shape of the resulting syntax tree, or the diagnostic on failure.

use crate::{
    lexer,
    parser::build_jdl,
    parser_types::*,
    runtime::Runtime,
};

fn significant(source: &str) -> Vec<crate::tokens::PositionedToken<'_>> {
    let runtime = Runtime::build(None).expect("default runtime");
    lexer::tokenize(source, &runtime)
        .expect("Lexer should succeed")
        .into_iter()
        .filter(|token| !token.is_trivia())
        .collect()
}

/// Parse `source`, panicking with the diagnostic on failure
fn parse_ok(source: &str) -> Vec<Declaration<'_>> {
    let tokens = significant(source);
    match build_jdl(&tokens) {
        Ok(jdl) => jdl.declarations,
        Err(err) => panic!("Expected parsing to succeed, but got error: {err}"),
    }
}

/// Parse `source` and return the error message
fn parse_err(source: &str) -> String {
    let tokens = significant(source);
    match build_jdl(&tokens) {
        Ok(jdl) => panic!("Expected parsing to fail, but got {jdl:?}"),
        Err(err) => err.message().to_string(),
    }
}

fn only<'a, 'src>(declarations: &'a [Declaration<'src>]) -> &'a Declaration<'src> {
    assert_eq!(declarations.len(), 1, "expected one declaration: {declarations:?}");
    &declarations[0]
}

#[test]
fn test_empty_source() {
    assert!(parse_ok("").is_empty());
    assert!(parse_ok("// only a comment\n/* block */").is_empty());
    assert!(parse_ok("/** dangling documentation */").is_empty());
}

#[test]
fn test_constant() {
    let declarations = parse_ok("MAX_LENGTH = 42");
    let Declaration::Constant(constant) = only(&declarations) else {
        panic!("expected a constant");
    };
    assert_eq!(*constant.name.inner(), "MAX_LENGTH");
    assert_eq!(*constant.value.inner(), "42");
}

#[test]
fn test_entity_without_body() {
    let declarations = parse_ok("entity Region");
    let Declaration::Entity(entity) = only(&declarations) else {
        panic!("expected an entity");
    };
    assert_eq!(*entity.name.inner(), "Region");
    assert!(entity.table_name.is_none());
    assert!(entity.fields.is_empty());
}

#[test]
fn test_entity_with_table_and_empty_body() {
    let declarations = parse_ok("entity JobHistory (job_history) {}");
    let Declaration::Entity(entity) = only(&declarations) else {
        panic!("expected an entity");
    };
    assert_eq!(entity.table_name.as_ref().map(|t| *t.inner()), Some("job_history"));
}

#[test]
fn test_entity_fields_and_validations() {
    let source = r#"
/** The employee entity. */
@ChangelogDate("20240101")
@Paginate
entity Employee {
  /** The first name */
  firstName String required minlength(2) maxlength(MAX),
  email String pattern(/^[^@\s]+@[^@\s]+$/)
  @Id
  salary Long min(0)
}
"#;
    let declarations = parse_ok(source);
    let Declaration::Entity(entity) = only(&declarations) else {
        panic!("expected an entity");
    };

    assert_eq!(entity.documentation, Some(" The employee entity. "));
    let annotations: Vec<&str> = entity.annotations.iter().map(|a| *a.name.inner()).collect();
    assert_eq!(annotations, vec!["ChangelogDate", "Paginate"]);
    assert_eq!(entity.fields.len(), 3);

    let first_name = &entity.fields[0];
    assert_eq!(first_name.documentation, Some(" The first name "));
    assert_eq!(*first_name.field_type.inner(), "String");
    assert_eq!(first_name.validations.len(), 3);
    assert_eq!(
        first_name.validations[2].argument.as_ref().map(|a| a.inner().clone()),
        Some(ValidationArg::Constant("MAX"))
    );

    let email = &entity.fields[1];
    assert_eq!(
        email.validations[0].argument.as_ref().map(|a| a.inner().clone()),
        Some(ValidationArg::Pattern("^[^@\\s]+@[^@\\s]+$"))
    );

    let salary = &entity.fields[2];
    assert_eq!(*salary.annotations[0].name.inner(), "Id");
}

#[test]
fn test_annotations_before_documentation() {
    let declarations = parse_ok("@Skip\n/** doc */\nentity A");
    let Declaration::Entity(entity) = only(&declarations) else {
        panic!("expected an entity");
    };
    assert_eq!(entity.documentation, Some(" doc "));
    assert_eq!(entity.annotations.len(), 1);
}

#[test]
fn test_enum_values() {
    let source = r#"
enum Language {
  FRENCH (french),
  /** Spoken in Spain */
  SPANISH ("Español"),
  ENGLISH
}
"#;
    let declarations = parse_ok(source);
    let Declaration::Enum(jdl_enum) = only(&declarations) else {
        panic!("expected an enum");
    };
    assert_eq!(*jdl_enum.name.inner(), "Language");
    let values: Vec<(&str, Option<String>)> = jdl_enum
        .values
        .iter()
        .map(|v| (*v.name.inner(), v.value.as_ref().map(|l| l.text().to_string())))
        .collect();
    assert_eq!(
        values,
        vec![
            ("FRENCH", Some("french".to_string())),
            ("SPANISH", Some("Español".to_string())),
            ("ENGLISH", None),
        ]
    );
    assert_eq!(jdl_enum.values[1].documentation, Some(" Spoken in Spain "));
}

#[test]
fn test_relationship_group() {
    let source = r#"
relationship OneToMany {
  @Id Employee{job} to
  /** the owner */
  Job{employee(lastName) required},
  Department to Employee
}
relationship ManyToOne {
  Employee{user(login)} to User with builtInEntity
}
"#;
    let declarations = parse_ok(source);
    assert_eq!(declarations.len(), 2);

    let Declaration::Relationship(group) = &declarations[0] else {
        panic!("expected a relationship group");
    };
    assert_eq!(*group.kind.inner(), jdl_core::relationship::RelationshipKind::OneToMany);
    assert_eq!(group.relationships.len(), 2);
    let first = &group.relationships[0];
    assert_eq!(*first.from.annotations[0].name.inner(), "Id");
    assert_eq!(first.to.documentation, Some(" the owner "));
    assert!(first.to.required);
    assert_eq!(first.to.display_field.as_ref().map(|f| *f.inner()), Some("lastName"));

    let Declaration::Relationship(group) = &declarations[1] else {
        panic!("expected a relationship group");
    };
    let with: Vec<&str> = group.relationships[0].with.iter().map(|a| *a.name.inner()).collect();
    assert_eq!(with, vec!["builtInEntity"]);
}

#[test]
fn test_application_block() {
    let source = r#"
application {
  config {
    baseName store
    applicationType gateway
    serverPort 8080
    languages [en, fr]
    testFrameworks []
    jhiPrefix "my"
  }
  config(generator-jhipster-dotnetcore) {
    namespace Store
  }
  entities * except Audit
  dto * with mapstruct
  skipClient Audit
}
"#;
    let declarations = parse_ok(source);
    let Declaration::Application(application) = only(&declarations) else {
        panic!("expected an application");
    };

    assert_eq!(application.configs.len(), 2);
    let config = &application.configs[0];
    assert!(config.namespace.is_none());
    assert_eq!(config.entries.len(), 6);
    let ConfigValue::List(languages) = config.entries[3].value.inner() else {
        panic!("expected a list value");
    };
    let languages: Vec<&str> = languages.iter().map(|language| language.text()).collect();
    assert_eq!(languages, vec!["en", "fr"]);
    assert_eq!(*config.entries[4].value.inner(), ConfigValue::List(Vec::new()));
    assert_eq!(
        application.configs[1].namespace.as_ref().map(|n| *n.inner()),
        Some("generator-jhipster-dotnetcore")
    );

    let entities = application.entities.as_ref().expect("entities clause");
    assert_eq!(*entities.list.inner(), EntityList::All);
    let except: Vec<&str> = entities.except.iter().map(|n| *n.inner()).collect();
    assert_eq!(except, vec!["Audit"]);
    assert_eq!(application.options.len(), 2);
}

#[test]
fn test_option_declarations() {
    let source = r#"
dto * with mapstruct except Audit, Log
service Employee, Job with serviceImpl
paginate Job with "infinite-scroll"
skipClient *
use serviceClass, pagination for * except Audit
"#;
    let declarations = parse_ok(source);
    assert_eq!(declarations.len(), 5);

    let Declaration::Option(OptionDecl::Binary { name, selector, value }) = &declarations[0]
    else {
        panic!("expected a binary option");
    };
    assert_eq!(*name.inner(), "dto");
    assert_eq!(*selector.list.inner(), EntityList::All);
    assert_eq!(selector.except.len(), 2);
    assert_eq!(value.text(), "mapstruct");

    let Declaration::Option(OptionDecl::Binary { value, .. }) = &declarations[2] else {
        panic!("expected a binary option");
    };
    assert!(value.is_string());

    assert!(matches!(
        &declarations[3],
        Declaration::Option(OptionDecl::Unary { .. })
    ));

    let Declaration::Option(OptionDecl::Use { values, selector }) = &declarations[4] else {
        panic!("expected a use declaration");
    };
    let values: Vec<&str> = values.iter().map(|v| *v.inner()).collect();
    assert_eq!(values, vec!["serviceClass", "pagination"]);
    assert_eq!(selector.except.len(), 1);
}

#[test]
fn test_deployment() {
    let source = r#"
deployment {
  deploymentType kubernetes
  appsFolders [store, invoice]
  istio true
}
"#;
    let declarations = parse_ok(source);
    let Declaration::Deployment(deployment) = only(&declarations) else {
        panic!("expected a deployment");
    };
    assert_eq!(deployment.entries.len(), 3);
    assert_eq!(*deployment.entries[0].name.inner(), "deploymentType");
}

#[test]
fn test_keywords_as_names() {
    let declarations = parse_ok("entity Entity { to String, with Integer }");
    let Declaration::Entity(entity) = only(&declarations) else {
        panic!("expected an entity");
    };
    let names: Vec<&str> = entity.fields.iter().map(|f| *f.name.inner()).collect();
    assert_eq!(names, vec!["to", "with"]);
}

#[test]
fn test_error_missing_field_type() {
    assert_eq!(
        parse_err("entity A {\n  name ,\n}"),
        "found an invalid token ',' at line 2 and column 8"
    );
}

#[test]
fn test_error_unknown_relationship_kind() {
    assert_eq!(
        parse_err("relationship OneToFew {\n  A to B\n}"),
        "found an invalid token 'OneToFew' at line 1 and column 14"
    );
}

#[test]
fn test_error_annotation_before_application() {
    assert_eq!(
        parse_err("@Foo application { }"),
        "found an invalid token 'application' at line 1 and column 6"
    );
}

#[test]
fn test_error_stray_token_at_top_level() {
    assert_eq!(
        parse_err("entity A\n}"),
        "found an invalid token '}' at line 2 and column 1"
    );
}

#[test]
fn test_error_unclosed_block() {
    assert_eq!(parse_err("enum Color { RED, GREEN"), "unexpected end of input");
    assert_eq!(parse_err("application {"), "unexpected end of input");
}

#[test]
fn test_error_binary_option_without_value() {
    assert_eq!(
        parse_err("dto * except A"),
        "found an invalid token 'except' at line 1 and column 7"
    );
}
