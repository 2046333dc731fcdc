use init::server_init::server_init_proc;
use tracing::info;

// modules tree
pub mod build_info;
pub mod docs;
pub mod schema;

pub mod domain {
    pub mod comment;
    pub mod interaction;
    pub mod notification;
    pub mod post;
    pub mod report;
    pub mod user;
}
pub mod dto {
    pub mod requests {
        pub mod auth {
            pub mod forgot_password_request;
            pub mod login_request;
            pub mod register_request;
            pub mod reset_password_request;
        }
        pub mod comment {
            pub mod submit_comment_request;
            pub mod update_comment_request;
        }
        pub mod post {
            pub mod get_posts_request;
            pub mod report_post_request;
        }
        pub mod report {
            pub mod update_report_request;
        }
        pub mod user {
            pub mod update_profile_request;
        }
    }
    pub mod responses {
        pub mod message_response;
        pub mod response_data;
        pub mod toggle_response;

        pub mod auth {
            pub mod login_response;
            pub mod register_response;
        }
        pub mod notification {
            pub mod mark_all_read_response;
        }
        pub mod post {
            pub mod save_post_response;
        }
    }
}
pub mod errors {
    pub mod code_error;
}
pub mod handlers {
    pub mod fallback;

    pub mod auth {
        pub mod forgot_password;
        pub mod login;
        pub mod logout;
        pub mod register;
        pub mod reset_password;
    }
    pub mod comment {
        pub mod delete_comment;
        pub mod list_comments;
        pub mod submit_comment;
        pub mod toggle_comment_helpful;
        pub mod toggle_comment_like;
        pub mod update_comment;
    }
    pub mod notification {
        pub mod list_notifications;
        pub mod mark_all_read;
    }
    pub mod post {
        pub mod delete_post;
        pub mod get_post;
        pub mod list_posts;
        pub mod report_post;
        pub mod save_post;
        pub mod saved_posts;
        pub mod submit_post;
        pub mod toggle_post_helpful;
        pub mod toggle_post_like;
        pub mod unsave_post;
    }
    pub mod report {
        pub mod get_report;
        pub mod list_reports;
        pub mod update_report;
    }
    pub mod server {
        pub mod healthcheck;
    }
    pub mod uploads {
        pub mod serve_upload;
    }
    pub mod user {
        pub mod get_me;
        pub mod update_me;
    }
}
pub mod routers {
    pub mod main_router;

    pub mod middleware {
        pub mod auth;
        pub mod identity;
        pub mod logging;
    }
}
pub mod init {
    pub mod config;
    pub mod server_init;
    pub mod state;
}
pub mod util {
    pub mod auth {
        pub mod identity;
        pub mod token;
    }
    pub mod crypto {
        pub mod hash_pw;
        pub mod verify_pw;
    }
    pub mod email {
        pub mod emails;
    }
    pub mod string {
        pub mod validations;
    }
    pub mod time {
        pub mod now;
    }
}

#[cfg(test)]
pub mod test {
    pub mod router_smoke;
}

// main function
#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let start = tokio::time::Instant::now();
    tracing_subscriber::fmt().init();

    info!("Initializing server...");
    server_init_proc(start).await?;

    Ok(())
}
