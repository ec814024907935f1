use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

/// Pure clap command definitions with zero business logic
#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("host")
                .help("hostname or IP address to grab")
                .required(true)
                .value_name("HOST"),
        )
        .arg(
            Arg::new("port")
                .default_value("443")
                .env("TLSGRAB_PORT")
                .help("port to connect to")
                .long("port")
                .short('p')
                .value_name("PORT"),
        )
        .arg(
            Arg::new("timeout")
                .default_value("5")
                .env("TLSGRAB_TIMEOUT")
                .help("dial/handshake deadline in seconds, 0 disables it")
                .long("timeout")
                .short('t')
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("server-name")
                .env("TLSGRAB_SERVER_NAME")
                .help("SNI value to send, inferred from HOST when not set")
                .long("server-name")
                .short('s')
                .value_name("NAME"),
        )
        .arg(
            Arg::new("min-version")
                .env("TLSGRAB_MIN_VERSION")
                .help("lower protocol bound")
                .long("min-version")
                .value_name("VERSION")
                .value_parser(["ssl30", "tls10", "tls11", "tls12"]),
        )
        .arg(
            Arg::new("max-version")
                .env("TLSGRAB_MAX_VERSION")
                .help("upper protocol bound")
                .long("max-version")
                .value_name("VERSION")
                .value_parser(["ssl30", "tls10", "tls11", "tls12"]),
        )
        .arg(
            Arg::new("certs-only")
                .action(ArgAction::SetTrue)
                .help("stop the handshake once certificates have been retrieved")
                .long("certs-only"),
        )
        .arg(
            Arg::new("verify")
                .action(ArgAction::SetTrue)
                .help("verify the server certificate chain against the WebPKI roots")
                .long("verify"),
        )
}
