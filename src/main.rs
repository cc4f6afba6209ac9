use ktx_portal::auth::password::workflow::{
    ChangePasswordWorkflow, Completion, Notification, PasswordField, SubmitStep, WorkflowError, WorkflowState,
};
use ktx_portal::config::{load_config, password_rules};
use ktx_portal::housing::RoomOccupancy;
use ktx_portal::models::{PaymentQuery, RoomQuery, TransferQuery};
use ktx_portal::types::{ApiError, AppConfig};
use ktx_portal::utils::normalize_error;
use ktx_portal::{ApiClient, AuthApi, BedApi, FileSessionStore, PaymentApi, RoomApi, SessionStore, TransferApi};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;

const USAGE: &str = "Usage: ktx-portal <command>

Commands:
  login <username> <password>   Sign in and store the session
  logout                        Sign out
  whoami                        Show the signed-in user
  rooms [available]             List rooms with occupancy
  beds <room-id>                List beds of a room
  payments                      List payments (own payments for students)
  transfers                     List room-transfer requests
  strength <password>           Evaluate a password against the policy
  change-password               Change the password interactively";

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    #[error("Không đọc được dữ liệu nhập: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Usage(String),
}

fn report(error: &ApiError) {
    if error.is_unauthenticated() {
        eprintln!("Phiên đăng nhập đã hết hạn. Vui lòng đăng nhập lại: ktx-portal login");
        return;
    }
    let normalized = normalize_error(error);
    match normalized.general_message {
        Some(message) => eprintln!("{}", message),
        None => {
            for (field, message) in normalized.field_errors {
                eprintln!("{}: {}", field, message);
            }
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level)).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&config, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Api(e)) => {
            report(&e);
            ExitCode::FAILURE
        },
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        },
    }
}

async fn run(config: &AppConfig, args: &[String]) -> Result<(), CliError> {
    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(&config.session_file)?);
    let client = ApiClient::from_config(config, session.clone())?;
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["login", username, password] => {
            let user = AuthApi::new(client).login(username, password).await?;
            println!("Xin chào, {}", user.display_name());
        },
        ["logout"] => {
            AuthApi::new(client).logout().await?;
            println!("Đã đăng xuất");
        },
        ["whoami"] => {
            let user = AuthApi::new(client).me().await?;
            println!("{} ({})", user.display_name(), user.role);
        },
        ["rooms"] => print_rooms(&client, false).await?,
        ["rooms", "available"] => print_rooms(&client, true).await?,
        ["beds", room_id] => {
            let room_id = room_id
                .parse::<i64>()
                .map_err(|_| CliError::Usage(format!("Mã phòng không hợp lệ: {}", room_id)))?;
            for bed in BedApi::new(client).list_by_room(room_id).await? {
                println!(
                    "{:<6} {:<12} {}",
                    bed.so_giuong,
                    bed.trang_thai,
                    bed.ma_sinh_vien.as_deref().unwrap_or("-")
                );
            }
        },
        ["payments"] => {
            let is_staff = session.load().map(|s| s.user.is_staff()).unwrap_or(false);
            let api = PaymentApi::new(client);
            let payments = if is_staff {
                api.list(&PaymentQuery::default()).await?
            } else {
                api.mine().await?
            };
            for payment in &payments {
                println!(
                    "#{:<5} {:<10} {:>12} {:<12} {}",
                    payment.id, payment.ma_sinh_vien, payment.so_tien, payment.loai_thanh_toan, payment.trang_thai
                );
            }
            println!(
                "Còn nợ: {}",
                ktx_portal::models::payment::outstanding_total(&payments)
            );
        },
        ["transfers"] => {
            let is_staff = session.load().map(|s| s.user.is_staff()).unwrap_or(false);
            let api = TransferApi::new(client);
            let requests = if is_staff {
                api.list(&TransferQuery::default()).await?
            } else {
                api.mine().await?
            };
            for request in requests {
                println!(
                    "#{:<5} {:<10} -> phòng {:<6} {:<10} {}",
                    request.id, request.ma_sinh_vien, request.phong_muon, request.trang_thai, request.ly_do
                );
            }
        },
        ["strength", password] => {
            let result = password_rules(config).evaluate(password);
            match result.label {
                Some(label) => println!("{} ({}/{})", label.display_text(), result.score, password_rules(config).rule_count()),
                None => println!("-"),
            }
            for violation in &result.violations {
                println!("  - {}", violation);
            }
        },
        ["change-password"] => change_password(config, AuthApi::new(client)).await?,
        _ => println!("{}", USAGE),
    }
    Ok(())
}

async fn print_rooms(client: &ApiClient, only_available: bool) -> Result<(), ApiError> {
    let api = RoomApi::new(client.clone());
    let rooms = if only_available {
        api.available().await?
    } else {
        api.list(&RoomQuery::default()).await?
    };
    for room in rooms {
        let occupancy = RoomOccupancy::from_beds(&room, &[]);
        println!(
            "{:<6} {:>2}/{:<2} {:<12} {}",
            room.so_phong,
            occupancy.occupied,
            occupancy.capacity,
            room.trang_thai,
            if occupancy.is_full() { "đầy" } else { "" }
        );
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String, CliError> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(CliError::Usage("Đã hủy".to_string()));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn change_password(config: &AppConfig, auth: AuthApi) -> Result<(), CliError> {
    let mut workflow = ChangePasswordWorkflow::new(password_rules(config), config.require_confirmation);
    let labels = [
        (PasswordField::CurrentPassword, "Mật khẩu hiện tại"),
        (PasswordField::NewPassword, "Mật khẩu mới"),
        (PasswordField::ConfirmPassword, "Xác nhận mật khẩu mới"),
    ];

    loop {
        for (field, label) in labels {
            if workflow.value(field).is_empty() || workflow.error(field).is_some() {
                if let Some(error) = workflow.error(field) {
                    println!("  ! {}", error);
                }
                let value = prompt(label)?;
                workflow.set_field(field, value)?;
            }
        }

        let request = match workflow.submit()? {
            SubmitStep::Invalid => continue,
            SubmitStep::Ready(request) => request,
            SubmitStep::ConfirmationRequired => {
                let answer = prompt("Xác nhận đổi mật khẩu? (y/N)")?;
                if !answer.trim().eq_ignore_ascii_case("y") {
                    workflow.cancel()?;
                    println!("Đã hủy");
                    return Ok(());
                }
                workflow.confirm()?
            },
        };

        let result = auth.change_password(&request).await;
        let completion = workflow.complete(result)?;
        match completion.notification() {
            Some(Notification::Success(message)) => println!("{}", message),
            Some(Notification::Error(message)) => eprintln!("{}", message),
            None => {},
        }

        match completion {
            Completion::Succeeded {
                ..
            } => return Ok(()),
            Completion::SessionExpired {
                message,
            } => return Err(ApiError::Unauthenticated(message).into()),
            Completion::Failed {
                ..
            } => {
                if !prompt("Thử lại? (y/N)")?.trim().eq_ignore_ascii_case("y") {
                    return Ok(());
                }
            },
            Completion::FieldErrors {
                ..
            } => debug_assert_eq!(workflow.state(), WorkflowState::Editing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ktx_portal::auth::password::PasswordRules;

    #[test]
    fn test_workflow_error_keeps_its_kind() {
        let mut workflow = ChangePasswordWorkflow::new(PasswordRules::default(), true);
        let error: CliError = workflow.cancel().unwrap_err().into();
        assert!(matches!(
            error,
            CliError::Workflow(WorkflowError::InvalidTransition(WorkflowState::Editing))
        ));
    }

    #[test]
    fn test_input_failure_is_not_a_config_error() {
        let error: CliError = io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed").into();
        assert!(matches!(error, CliError::Io(_)));
        assert!(error.to_string().contains("stdin closed"));
    }

    #[test]
    fn test_api_error_passes_through() {
        let error: CliError = ApiError::Unauthenticated("Token hết hạn".to_string()).into();
        assert!(matches!(error, CliError::Api(ref e) if e.is_unauthenticated()));
        assert_eq!(error.to_string(), "Token hết hạn");
    }
}
