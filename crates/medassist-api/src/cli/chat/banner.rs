//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat.
///
/// Shows the API endpoint, the backend session (or that one will be created
/// on the first message), and how many local messages were restored.
pub fn print_welcome_banner(api_base_url: &str, session_id: Option<&str>, restored: usize, ephemeral: bool) {
    println!();
    println!("  {} {}", style("+").red().bold(), style("MedAssist").cyan().bold());
    println!(
        "  {}",
        style("General medical information, not a substitute for professional care.").dim()
    );
    println!();
    println!("  {}   {}", style("Server:").bold(), style(api_base_url).dim());
    match session_id {
        Some(id) => println!("  {}  {}", style("Session:").bold(), style(id).dim()),
        None => println!("  {}  {}", style("Session:").bold(), style("new").dim()),
    }
    if restored > 0 {
        println!(
            "  {}  {} message{} restored",
            style("History:").bold(),
            restored,
            if restored == 1 { "" } else { "s" }
        );
    }
    if ephemeral {
        println!("  {}  {}", style("Storage:").bold(), style("in memory only").yellow());
    }
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
