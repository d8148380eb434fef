use axum::response::Html;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>Neighbourhood Pro Finder API</title>
        <style>
            body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; line-height: 1.6; }
            h1 { color: #2c3e50; border-bottom: 1px solid #eee; padding-bottom: 10px; }
            h2 { color: #3498db; margin-top: 30px; }
            code { background-color: #f8f9fa; padding: 2px 5px; border-radius: 3px; font-family: monospace; }
            .endpoint { background-color: #f8f9fa; padding: 15px; border-radius: 5px; margin-bottom: 15px; }
            .method { font-weight: bold; color: #27ae60; }
        </style>
    </head>
    <body>
        <h1>Neighbourhood Pro Finder API</h1>
        <p>Service provider recommendations by service type and neighborhood.</p>

        <h2>Endpoints</h2>

        <div class="endpoint">
            <p><span class="method">GET</span> <code>/ping</code></p>
            <p>Health check. Returns <code>{"status": "ok"}</code>.</p>
        </div>

        <div class="endpoint">
            <p><span class="method">GET</span> <code>/options</code></p>
            <p>Service types and neighbourhoods currently in the directory.</p>
        </div>

        <div class="endpoint">
            <p><span class="method">GET</span> <code>/recommendations</code></p>
            <p>Providers for a service type in a neighborhood, best rated first.</p>
            <p>Required query parameters:</p>
            <ul>
                <li><code>service_type</code>: the type of service needed (e.g. plumber, electrician)</li>
                <li><code>neighborhood</code>: the neighborhood to search in</li>
            </ul>
            <p>Example: <code>/recommendations?service_type=plumber&amp;neighborhood=downtown</code></p>
        </div>

        <h2>Frontend</h2>
        <p>The web frontend is deployed separately.</p>
    </body>
</html>
"#;

/// Static page describing the API
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
