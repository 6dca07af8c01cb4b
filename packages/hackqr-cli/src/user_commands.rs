use anyhow::{Context, Result};
use clap::Subcommand;
use hackqr_sdk::{HackQrClient, RegisterUserRequest, Role, UserItem, VerificationStatus};

#[derive(Subcommand)]
pub enum UserAction {
    /// Register a new participant or staff member
    Register {
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        /// STUDENT, ADMIN, JUDGE or SCANNER
        #[arg(long, default_value = "STUDENT")]
        role: Role,
    },
    /// Mark a user's identity as verified
    Approve { id: i32 },
    /// Reject a user's identity verification
    Reject { id: i32 },
    /// Show a user
    Show { id: i32 },
}

pub fn format_user(user: &UserItem) -> String {
    format!(
        "#{} {} <{}> {} [{} / {}]",
        user.id, user.name, user.email, user.phone, user.role, user.verification_status
    )
}

pub async fn handle_user_command(client: &HackQrClient, action: UserAction) -> Result<()> {
    match action {
        UserAction::Register {
            name,
            email,
            phone,
            role,
        } => {
            let request = RegisterUserRequest {
                name,
                email,
                phone,
                role,
            };
            let user = client
                .register_user(&request)
                .await
                .context("failed to register user")?;
            println!("✅ User registered");
            println!("   {}", format_user(&user));
        }
        UserAction::Approve { id } => {
            let user = client
                .set_verification(id, VerificationStatus::Approved)
                .await
                .context("failed to approve user")?;
            println!("✅ User approved");
            println!("   {}", format_user(&user));
        }
        UserAction::Reject { id } => {
            let user = client
                .set_verification(id, VerificationStatus::Rejected)
                .await
                .context("failed to reject user")?;
            println!("🚫 User rejected");
            println!("   {}", format_user(&user));
        }
        UserAction::Show { id } => {
            let user = client.get_user(id).await.context("failed to load user")?;
            println!("👤 {}", format_user(&user));
        }
    }
    Ok(())
}
