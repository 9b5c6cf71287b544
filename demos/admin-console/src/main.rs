use tokio::io::{AsyncBufReadExt, BufReader};
use userdesk::prelude::*;
use userdesk::protocol::endpoints;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// `admin-console [PATH]`
///
/// Credentials come from `USERDESK_EMAIL` and `USERDESK_PASSWORD`. Without
/// them the console only resolves the session already held by the backend.
#[derive(Debug, PartialEq, Eq)]
struct Args {
    path: String,
    credentials: Option<(String, String)>,
}

impl Args {
    fn parse(mut argv: impl Iterator<Item = String>, env: impl Fn(&str) -> Option<String>) -> Self {
        let path = argv.nth(1).unwrap_or_else(|| "/".to_string());
        let credentials = env("USERDESK_EMAIL").zip(env("USERDESK_PASSWORD"));
        Self { path, credentials }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

const ALL_PATHS: [&str; 9] = [
    "/",
    "/new-user",
    "/edit-user/1",
    "/reportes/rol-distribution",
    "/activity-logs",
    "/settings",
    "/settings/account",
    "/settings/password",
    "/verify-2fa",
];

fn describe(path: &str, nav: &Navigation) -> String {
    match &nav.decision {
        Decision::Loading => format!("{path:<28} loading"),
        Decision::Render(view) if nav.was_redirected() => format!("{path:<28} -> {view}"),
        Decision::Render(view) => format!("{path:<28} ok ({view})"),
        Decision::Redirect(view) => format!("{path:<28} redirect {view}"),
    }
}

async fn read_code() -> std::io::Result<String> {
    eprint!("two-factor code: ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim().to_string())
}

fn print_step(step: &Step) {
    if let Some(note) = &step.notification {
        println!("{note}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    userdesk::telemetry::init();

    let args = Args::parse(std::env::args(), |key| std::env::var(key).ok());
    let config = UserdeskConfig::from_env();
    eprintln!(
        "admin console against {}",
        endpoints::join(&config.base_url, "/")
    );

    let mut desk = UserdeskBuilder::new().config(config).build()?;
    let nav = desk.start(&args.path).await?;
    println!("{}", describe(&args.path, &nav));

    let credentials = args.credentials.as_ref().filter(|_| !desk.state().is_authenticated());
    if let Some((email, password)) = credentials {
        let step = desk.login(email, password).await?;
        print_step(&step);
        if step.view() == Some(&View::VerifyTwoFactor) {
            let code = read_code().await?;
            print_step(&desk.verify_two_factor(&code).await?);
        }
    }

    match desk.current_user() {
        Some(user) => println!("signed in as {} <{}> ({})", user.full_name(), user.email, user.role),
        None => println!("not signed in"),
    }

    for path in ALL_PATHS {
        let nav = desk.navigate(path)?;
        println!("{}", describe(path, &nav));
    }

    tracing::debug!("done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_transport::{Method, ScriptedBackend};

    fn env(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_args_default_path_and_no_credentials() {
        let args = Args::parse(["admin-console".to_string()].into_iter(), env(&[]));

        assert_eq!(args.path, "/");
        assert_eq!(args.credentials, None);
    }

    #[test]
    fn test_args_need_both_credentials() {
        let argv = ["admin-console", "/activity-logs"].map(String::from).into_iter();
        let args = Args::parse(argv, env(&[("USERDESK_EMAIL", "a@b.com")]));

        assert_eq!(args.path, "/activity-logs");
        assert_eq!(args.credentials, None);
    }

    #[tokio::test]
    async fn test_describe_anonymous_redirect() {
        let backend = ScriptedBackend::new();
        backend.fail(Method::Get, endpoints::SESSION_USER);
        let mut desk = UserdeskBuilder::new()
            .build_with_backend(backend)
            .expect("valid config");

        let nav = desk.start("/new-user").await.expect("starts");

        assert_eq!(describe("/new-user", &nav), format!("{:<28} -> /login", "/new-user"));
    }
}
