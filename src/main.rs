//src/main.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

use staffdesk::config::AppState;
use staffdesk::handlers;
use staffdesk::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login));

    // Rotas de usuários e documentos (protegidas pelo middleware).
    // O cadastro sobe dois arquivos de até 1 MiB; o limite do corpo dá
    // folga para o envelope multipart.
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/"
               ,post(handlers::users::create_user)
               .get(handlers::users::list_users)
        )
        .route("/{user_id}/documents/{filename}"
               ,get(handlers::documents::show_document)
        )
        .layer(DefaultBodyLimit::max(4 * 1024 * 1024))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
