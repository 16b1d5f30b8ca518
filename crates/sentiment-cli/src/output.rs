//! Output formatting for CLI responses.

use sentiment_types::DiagnosticError;

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("[OK] {message}");
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

/// Prints the cause and fix of a diagnosable error, if it has any.
pub fn print_diagnostics(err: &dyn DiagnosticError) {
    if let Some(hint) = err.hint() {
        eprintln!("\n  Cause: {hint}");
    }
    if let Some(fix) = err.fix() {
        eprintln!("  Fix:   {fix}\n");
    }
}
