use ember_value::{BuiltinVars, Value};

/// Returns the default [`BuiltinVars`] that should be used.
pub fn default_builtin_vars() -> BuiltinVars {
    let mut builtin_vars = BuiltinVars::new();
    builtin_vars.add_native_fn("print", &print, 1);
    builtin_vars.add_native_fn("println", &println, 1);
    builtin_vars.add_native_fn("assert_eq", &assert_eq, 2);
    builtin_vars.add_native_fn("assert", &assert, 1);
    builtin_vars
}

/// Strings are printed without quotes.
fn display(value: &Value) -> String {
    match value.cast_to_str() {
        Some(str) => str.to_string(),
        None => value.to_string(),
    }
}

pub fn print(args: &[Value]) -> Result<Value, String> {
    print!("{}", display(&args[0]));
    Ok(Value::Unit)
}

pub fn println(args: &[Value]) -> Result<Value, String> {
    println!("{}", display(&args[0]));
    Ok(Value::Unit)
}

pub fn assert(args: &[Value]) -> Result<Value, String> {
    match args[0] {
        Value::Bool(true) => Ok(Value::Unit),
        Value::Bool(false) => Err("assertion failed".to_string()),
        ref other => Err(format!("expected Bool, found {}", other.ty())),
    }
}

pub fn assert_eq(args: &[Value]) -> Result<Value, String> {
    let left = &args[0];
    let right = &args[1];

    if left == right {
        Ok(Value::Unit)
    } else {
        Err(format!("assertion failed: {} != {}", left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert() {
        assert_eq!(assert(&[Value::Bool(true)]), Ok(Value::Unit));
        assert_eq!(
            assert(&[Value::Bool(false)]),
            Err("assertion failed".to_string())
        );
        assert_eq!(
            assert(&[Value::Int(1)]),
            Err("expected Bool, found Int".to_string())
        );
    }

    #[test]
    fn test_assert_eq() {
        assert_eq!(
            assert_eq(&[Value::Int(1), Value::Int(1)]),
            Ok(Value::Unit)
        );
        assert_eq!(
            assert_eq(&[Value::Int(1), Value::String("1".to_string())]),
            Err(r#"assertion failed: 1 != "1""#.to_string())
        );
    }

    #[test]
    fn test_display_strings_unquoted() {
        assert_eq!(display(&Value::String("hi".to_string())), "hi");
        assert_eq!(display(&Value::Char('c')), "'c'");
    }
}
