use axum::{response::Html, routing::get, Router};

pub fn ui_routes() -> Router {
    Router::new().route("/", get(landing_page))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Inline message shown above the page content after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    fn render(&self) -> String {
        let (class, icon) = match self.kind {
            NoticeKind::Success => ("notice-success", "✅"),
            NoticeKind::Error => ("notice-error", "❌"),
            NoticeKind::Info => ("notice-info", "ℹ️"),
        };
        format!(
            r#"<div class="notice {}">{} {}</div>"#,
            class,
            icon,
            escape_html(&self.message)
        )
    }
}

/// Escape text for use in HTML element content and quoted attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Select options, marking `selected` when the slug matches
pub fn options<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>, selected: &str) -> String {
    items
        .into_iter()
        .map(|(slug, label)| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                slug,
                if slug == selected { " selected" } else { "" },
                escape_html(label)
            )
        })
        .collect()
}

pub struct PageLayout<'a> {
    pub title: &'a str,
    pub heading: &'a str,
    pub sidebar: String,
    pub body: String,
    pub notices: &'a [Notice],
    pub footer: &'a str,
}

const STYLES: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            line-height: 1.6;
            color: #e8e8e8;
            background: linear-gradient(135deg, #1a1a2e 0%, #16213e 50%, #0f1419 100%);
            min-height: 100vh;
        }

        .nav {
            display: flex;
            gap: 1.5rem;
            align-items: center;
            padding: 1rem 2rem;
            background: rgba(26, 26, 46, 0.9);
            border-bottom: 1px solid rgba(59, 130, 246, 0.3);
        }

        .nav a { color: white; text-decoration: none; padding: 0.4rem 1rem; border-radius: 20px; }
        .nav a:hover { background-color: rgba(59, 130, 246, 0.3); }
        .nav .logo { font-weight: bold; font-size: 1.3rem; }
        .nav form { margin-left: auto; }

        .layout { display: grid; grid-template-columns: 280px 1fr; gap: 2rem; padding: 2rem; }

        .sidebar {
            background: #262730;
            border-radius: 0.5rem;
            padding: 1.5rem;
            height: fit-content;
        }

        .sidebar label { display: block; margin: 1rem 0 0.3rem; font-size: 0.9rem; color: #b0b0c0; }
        .sidebar select, .sidebar input[type=range] { width: 100%; }

        select, input[type=text], textarea {
            background: #1E1E1E;
            color: #e8e8e8;
            border: 1px solid rgba(59, 130, 246, 0.3);
            border-radius: 0.5rem;
            padding: 0.6rem;
            font-size: 1rem;
        }

        textarea { width: 100%; min-height: 200px; font-family: 'Fira Code', monospace; }
        input[type=text] { width: 100%; }

        .main-title { text-align: center; font-size: 2.5rem; margin-bottom: 1.5rem; color: #4CAF50; }
        .sub-title { font-size: 1.5rem; margin: 1.5rem 0 1rem; color: #3b82f6; }

        .card {
            background: #262730;
            border-radius: 0.5rem;
            padding: 1.5rem;
            margin-bottom: 1rem;
            box-shadow: 0 2px 8px rgba(0, 0, 0, 0.3);
        }

        .info-text { color: #9ca3af; font-size: 0.9rem; }

        .response-area {
            margin-top: 1rem;
            padding: 1rem;
            border-left: 3px solid #4CAF50;
            background: rgba(76, 175, 80, 0.05);
            white-space: pre-wrap;
        }

        .code-block {
            background-color: #1E1E1E;
            padding: 1rem;
            border-radius: 0.5rem;
            white-space: pre-wrap;
            font-family: 'Fira Code', monospace;
        }

        .buttons { display: flex; gap: 1rem; margin: 1rem 0; }

        .btn {
            padding: 0.7rem 1.4rem;
            border: none;
            border-radius: 25px;
            font-weight: 600;
            cursor: pointer;
            background: linear-gradient(135deg, #3b82f6, #1d4ed8);
            color: white;
        }

        .btn-secondary { background: rgba(30, 30, 52, 0.8); border: 2px solid rgba(59, 130, 246, 0.3); }

        .notice { padding: 0.8rem 1rem; border-radius: 0.5rem; margin-bottom: 1rem; }
        .notice-success { background: rgba(76, 175, 80, 0.15); border: 1px solid #4CAF50; }
        .notice-error { background: rgba(220, 53, 69, 0.15); border: 1px solid #dc3545; }
        .notice-info { background: rgba(59, 130, 246, 0.15); border: 1px solid #3b82f6; }

        details { margin-bottom: 1rem; }
        summary { cursor: pointer; font-weight: 600; padding: 0.5rem 0; }
        a { color: #60a5fa; }

        .footer {
            text-align: center;
            margin: 3rem 2rem 2rem;
            padding: 1rem;
            background-color: #262730;
            border-radius: 0.5rem;
        }
"#;

pub fn render_page(layout: PageLayout<'_>) -> String {
    let notices: String = layout.notices.iter().map(Notice::render).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{styles}</style>
</head>
<body>
    <nav class="nav">
        <a class="logo" href="/">🎓 Study Hub</a>
        <a href="/mentor">💻 AI Coding Mentor</a>
        <a href="/lectures">📹 Lecture Summaries</a>
        <form method="post" action="/session/end">
            <button class="btn btn-secondary" type="submit">End Session</button>
        </form>
    </nav>
    <div class="layout">
        <aside class="sidebar">{sidebar}</aside>
        <main>
            <h1 class="main-title">{heading}</h1>
            {notices}
            {body}
        </main>
    </div>
    <div class="footer">{footer}</div>
</body>
</html>"#,
        title = escape_html(layout.title),
        styles = STYLES,
        sidebar = layout.sidebar,
        heading = escape_html(layout.heading),
        notices = notices,
        body = layout.body,
        footer = layout.footer,
    )
}

pub async fn landing_page() -> Html<String> {
    let body = r#"
            <div class="card">
                <h3>💻 AI Coding Mentor</h3>
                <p class="info-text">Get code reviews, debugging help, explanations and formatting from an AI mentor.</p>
                <div class="buttons"><a class="btn" href="/mentor">Open Coding Mentor</a></div>
            </div>
            <div class="card">
                <h3>📹 Lecture Summaries</h3>
                <p class="info-text">Turn a YouTube lecture into a structured summary using its transcript.</p>
                <div class="buttons"><a class="btn" href="/lectures">Open Lecture Summaries</a></div>
            </div>"#;

    let sidebar = r#"<h2 class="sub-title">Tools</h2>
        <p class="info-text">Your history on each page is kept for this browser session only.</p>"#;

    Html(render_page(PageLayout {
        title: "Study Hub",
        heading: "Study Hub 🎓",
        sidebar: sidebar.to_string(),
        body: body.to_string(),
        notices: &[],
        footer: "<p>Learn faster with AI-powered study tools.</p>",
    }))
}
