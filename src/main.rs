use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use anyhow::Context;
        use axum::{middleware, Router};
        use dotenv::dotenv;
        use env_logger::Env;
        use leptos::prelude::*;
        use leptos_axum::{generate_route_list, LeptosRoutes};
        use promptsmith::app::*;
        use promptsmith::config::GeminiConfig;
        use promptsmith::handlers;
        use promptsmith::middleware::trace_requests;
        use promptsmith::services::GeminiClient;
        use promptsmith::state::AppState;
        use tower_http::cors::CorsLayer;

        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            dotenv().ok();
            env_logger::init_from_env(Env::default().default_filter_or("info"));

            let gemini = GeminiConfig::from_env()?;
            log::info!("Using Gemini model {}", gemini.model);

            let conf = get_configuration(None).context("failed to read leptos configuration")?;
            let addr = conf.leptos_options.site_addr;
            let leptos_options = conf.leptos_options;

            // Generate the list of routes in your Leptos App
            let routes = generate_route_list(App);

            let app_state = AppState::new(leptos_options.clone(), GeminiClient::new(&gemini));

            let app = Router::new()
                .merge(handlers::routes())
                .leptos_routes(&app_state, routes, {
                    let leptos_options = leptos_options.clone();
                    move || shell(leptos_options.clone())
                })
                .fallback(leptos_axum::file_and_error_handler::<AppState, _>(shell))
                .layer(middleware::from_fn(trace_requests))
                .layer(CorsLayer::permissive())
                .with_state(app_state);

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            log::info!("listening on http://{}", &addr);
            axum::serve(listener, app.into_make_service()).await?;
            Ok(())
        }
    } else {
        pub fn main() {
            // no client-side main function
            // see lib.rs for hydration function instead
        }
    }
}
