use chrono::Local;

/// Banner appended ahead of the first prompt.
pub(crate) fn banner() -> String {
    let last_login = Local::now().format("%a %b %e %H:%M:%S %Y");
    format!(
        "Viridian Terminal\n\
         Last login: {last_login} on console\n\
         Type `help` to list the available commands.\n\n"
    )
}
