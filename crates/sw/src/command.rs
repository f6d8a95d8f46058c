use clap::{Parser, Subcommand};
use sessionward_core::client::BASE_URL_ENV;

pub const COOKIES_ENV: &str = "SESSIONWARD_COOKIES";

#[derive(Parser, Clone)]
#[command(name = "sw", version, about = "Session and CSRF token client", long_about = None)]
pub struct Cli {
    // Optional as a workaround for https://github.com/clap-rs/clap/issues/3572
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(
        long,
        global = true,
        env = BASE_URL_ENV,
        help = "Backend base url. Falls back to SESSIONWARD_BASE_URL or http://localhost:8080."
    )]
    pub base_url: Option<String>,

    #[arg(
        long,
        global = true,
        env = COOKIES_ENV,
        default_value = "",
        help = "Cookies sent with every request, formatted like `document.cookie` (`a=1; b=2`)."
    )]
    pub cookies: String,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    #[command(long_about = "Fetch the auth token and print it.")]
    Token,

    #[command(long_about = "Validate the current session against /account/check-auth.")]
    Check,

    #[command(long_about = "Send a GET request through the session client and print the body.")]
    Get {
        #[arg(help = "Path on the backend, e.g. /account/profile")]
        path: String,
    },

    #[command(long_about = "Force a token refresh and print the new token.")]
    Refresh,
}
