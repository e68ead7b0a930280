//! Userbase demo driver.
//!
//! # Responsibility
//! - Wire repository, service and async logger together and run one fixed flow.
//! - Print human-readable results to stdout; log records go to stderr.
//!
//! Registration and lookup failures are logged and skipped. A JSON encoding
//! failure ends the process with status 1.

use log::{debug, error, warn};
use std::process::ExitCode;
use std::sync::Arc;
use userbase_core::{
    init_logging, sum, users_to_json, AppConfig, AsyncLogger, Context, InMemoryUserRepository,
    UserRepository, UserService,
};

const SEED_USERS: [(&str, &str); 2] = [
    ("Gaurav", "gaurav@example.com"),
    ("Amit", "amit@example.com"),
];

fn main() -> ExitCode {
    let config = AppConfig::default();
    if let Err(err) = config.validate() {
        eprintln!("invalid configuration: {err}");
        return ExitCode::FAILURE;
    }
    println!("{}", config.banner());

    if let Err(err) = init_logging(&config.log_level, &config.log_target) {
        eprintln!("logging disabled: {err}");
    }

    let (ctx, cancel) = Context::with_timeout(&Context::background(), config.lookup_timeout);

    let repo = Arc::new(InMemoryUserRepository::new());
    let service = UserService::new(Arc::clone(&repo));

    let (log_tx, logger) = match AsyncLogger::builder()
        .capacity(config.log_capacity)
        .spawn()
    {
        Ok(pair) => pair,
        Err(err) => {
            error!("event=async_log_spawn module=cli status=error error={err}");
            eprintln!("failed to start async logger: {err}");
            return ExitCode::FAILURE;
        }
    };

    for (name, email) in SEED_USERS {
        let user = match service.register_user(name, email) {
            Ok(user) => user,
            Err(err) => {
                warn!("event=user_register module=cli status=error error={err}");
                continue;
            }
        };

        if let Err(err) = log_tx.send(format!("User created: {user:?}")) {
            warn!("event=async_log_send module=cli status=error error={err}");
        }
    }

    match service.get_user(&ctx, 1) {
        Ok(user) => println!("Fetched User: {user:?}"),
        Err(err) => error!("event=user_lookup module=cli status=error id=1 error={err}"),
    }

    let json = match users_to_json(&repo.list()) {
        Ok(json) => json,
        Err(err) => {
            error!("event=users_export module=cli status=error error={err}");
            return ExitCode::FAILURE;
        }
    };
    println!("All Users JSON:");
    println!("{json}");

    println!("Sum result: {}", sum(&[1, 2, 3, 4, 5]));

    log_tx.close();
    match logger.wait() {
        Ok(processed) => {
            debug!("event=async_log_done module=cli status=ok processed={processed}")
        }
        Err(err) => error!("event=async_log_done module=cli status=error error={err}"),
    }
    cancel.cancel();

    println!("Program finished cleanly");
    ExitCode::SUCCESS
}
