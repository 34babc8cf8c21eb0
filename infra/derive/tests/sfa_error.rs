use sfa_derive::sfa_error;
use std::borrow::Cow;
use std::io;

#[sfa_error]
pub enum LoadError {
    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: io::Error, context: Option<Cow<'static, str>> },

    #[error("Module missing{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_missing() -> Result<Vec<u8>, LoadError> {
    Err(io::Error::new(io::ErrorKind::NotFound, "gone")).context("reading conf.php")
}

#[test]
fn ui_pass() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/sfa_error_pass.rs");
}

#[test]
fn source_results_gain_context() {
    let err = read_missing().expect_err("read should fail");
    assert!(matches!(err, LoadError::Io { ref context, .. } if context.as_deref() == Some("reading conf.php")));
    assert_eq!(err.to_string(), "I/O error (reading conf.php): gone");
}

#[test]
fn question_mark_converts_sources() {
    fn inner() -> Result<(), LoadError> {
        Err(io::Error::other("denied"))?;
        Ok(())
    }

    let err = inner().expect_err("conversion should produce an error");
    assert_eq!(err.to_string(), "I/O error: denied");
}

#[test]
fn context_overrides_on_own_error_type() {
    let res: Result<(), LoadError> =
        Err(LoadError::Missing { message: "SC_Query".into(), context: None });
    let err = res.context("class path").expect_err("still an error");
    assert_eq!(err.to_string(), "Module missing (class path): SC_Query");
}

#[test]
fn strings_map_to_internal() {
    let from_static: LoadError = "static failure".into();
    let from_owned: LoadError = String::from("owned failure").into();
    assert!(matches!(from_static, LoadError::Internal { .. }));
    assert_eq!(from_owned.to_string(), "Internal error: owned failure");
}
