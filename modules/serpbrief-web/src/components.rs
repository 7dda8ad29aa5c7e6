use dioxus::prelude::*;

use crate::templates::render_to_html;

// --- View models ---

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub position: u32,
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExcerptView {
    pub title: String,
    pub url: String,
    pub status: String,
    pub ok: bool,
}

// --- Shared head ---

#[allow(non_snake_case)]
#[component]
fn PageHead(title: String) -> Element {
    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "{title} — serpbrief" }
            script { src: "https://cdn.tailwindcss.com" }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn ErrorBanner(error: Option<String>) -> Element {
    rsx! {
        if let Some(err) = &error {
            div { class: "bg-red-50 border border-red-200 text-red-800 text-sm px-3 py-2 rounded mb-4",
                "{err}"
            }
        }
    }
}

// --- Query form ---

#[allow(non_snake_case)]
#[component]
fn TextField(label: String, name: String, placeholder: String, required: bool) -> Element {
    rsx! {
        label { r#for: "{name}", class: "block text-sm text-gray-500 mb-1", "{label}" }
        input {
            r#type: "text", name: "{name}", id: "{name}",
            required: required, placeholder: "{placeholder}",
            class: "w-full px-3 py-2 border border-gray-300 rounded text-sm mb-3"
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn QueryForm(error: Option<String>) -> Element {
    rsx! {
        PageHead { title: "New brief".to_string() }
        body { class: "min-h-screen bg-gray-50 font-sans text-gray-900",
            div { class: "max-w-2xl mx-auto py-10 px-4",
                h1 { class: "text-2xl font-semibold mb-1", "serpbrief" }
                p { class: "text-gray-500 text-sm mb-6",
                    "Generate an SEO content brief for a target query: SERP lookup, \
                     competitor page analysis and an LLM-written outline, downloadable \
                     as Markdown."
                }
                ErrorBanner { error: error.clone() }
                form { method: "POST", action: "/generate",
                    div { class: "bg-white border border-gray-200 rounded-lg p-6 mb-4",
                        h2 { class: "text-lg font-medium mb-4", "Query" }
                        TextField {
                            label: "Target keyword".to_string(), name: "keyword".to_string(),
                            placeholder: "best hiking boots".to_string(), required: true
                        }
                        div { class: "grid grid-cols-2 gap-4",
                            div {
                                TextField {
                                    label: "Language".to_string(), name: "language".to_string(),
                                    placeholder: "English".to_string(), required: false
                                }
                            }
                            div {
                                TextField {
                                    label: "Location".to_string(), name: "location".to_string(),
                                    placeholder: "United States".to_string(), required: false
                                }
                            }
                        }
                        div { class: "grid grid-cols-2 gap-4",
                            div {
                                label { r#for: "device", class: "block text-sm text-gray-500 mb-1", "Device" }
                                select {
                                    name: "device", id: "device",
                                    class: "w-full px-3 py-2 border border-gray-300 rounded text-sm mb-3",
                                    option { value: "desktop", "desktop" }
                                    option { value: "mobile", "mobile" }
                                }
                            }
                            div {
                                label { r#for: "depth", class: "block text-sm text-gray-500 mb-1",
                                    "SERP results (rounded down to multiples of 10, max 100)"
                                }
                                input {
                                    r#type: "number", name: "depth", id: "depth",
                                    min: "3", max: "100", value: "10",
                                    class: "w-full px-3 py-2 border border-gray-300 rounded text-sm mb-3"
                                }
                            }
                        }
                        TextField {
                            label: "Tone of voice".to_string(), name: "tone".to_string(),
                            placeholder: "Professional and authoritative".to_string(), required: false
                        }
                        TextField {
                            label: "Target audience".to_string(), name: "audience".to_string(),
                            placeholder: "Marketing managers and content strategists".to_string(),
                            required: false
                        }
                        label { r#for: "notes", class: "block text-sm text-gray-500 mb-1", "Additional notes" }
                        textarea {
                            name: "notes", id: "notes", rows: "3",
                            class: "w-full px-3 py-2 border border-gray-300 rounded text-sm"
                        }
                    }
                    div { class: "bg-white border border-gray-200 rounded-lg p-6 mb-4",
                        h2 { class: "text-lg font-medium mb-1", "API credentials" }
                        p { class: "text-gray-500 text-xs mb-4",
                            "Used only for this run's API calls. Never stored, never logged."
                        }
                        TextField {
                            label: "DataForSEO login".to_string(), name: "dataforseo_login".to_string(),
                            placeholder: "login@example.com".to_string(), required: true
                        }
                        label { r#for: "dataforseo_password", class: "block text-sm text-gray-500 mb-1",
                            "DataForSEO password"
                        }
                        input {
                            r#type: "password", name: "dataforseo_password", id: "dataforseo_password",
                            required: true,
                            class: "w-full px-3 py-2 border border-gray-300 rounded text-sm mb-3"
                        }
                        label { r#for: "openai_api_key", class: "block text-sm text-gray-500 mb-1",
                            "OpenAI API key"
                        }
                        input {
                            r#type: "password", name: "openai_api_key", id: "openai_api_key",
                            required: true,
                            class: "w-full px-3 py-2 border border-gray-300 rounded text-sm"
                        }
                    }
                    button {
                        r#type: "submit",
                        class: "w-full py-2.5 bg-blue-600 text-white rounded text-sm font-medium cursor-pointer hover:bg-blue-800",
                        "Generate brief"
                    }
                }
            }
        }
    }
}

// --- Results page ---

#[allow(non_snake_case)]
#[component]
fn ResultsPage(
    keyword: String,
    results: Vec<ResultView>,
    excerpts: Vec<ExcerptView>,
    brief_markdown: String,
    brief_html: String,
    filename: String,
) -> Element {
    rsx! {
        PageHead { title: "Brief ready".to_string() }
        body { class: "min-h-screen bg-gray-50 font-sans text-gray-900",
            div { class: "max-w-3xl mx-auto py-10 px-4",
                div { class: "flex items-center justify-between mb-6",
                    h1 { class: "text-2xl font-semibold", "Brief for \"{keyword}\"" }
                    a { href: "/", class: "text-sm text-blue-600 hover:underline", "New query" }
                }

                div { class: "bg-white border border-gray-200 rounded-lg p-6 mb-4",
                    h2 { class: "text-lg font-medium mb-3", "Top SERP results" }
                    for result in results.iter() {
                        div { class: "mb-3",
                            p { class: "text-sm font-medium",
                                "{result.position}. "
                                a { href: "{result.url}", class: "text-blue-600 hover:underline",
                                    "{result.title}"
                                }
                            }
                            p { class: "text-xs text-gray-500", "{result.snippet}" }
                        }
                    }
                }

                div { class: "bg-white border border-gray-200 rounded-lg p-6 mb-4",
                    h2 { class: "text-lg font-medium mb-3", "Competitor pages" }
                    for excerpt in excerpts.iter() {
                        {
                            let badge = if excerpt.ok {
                                "inline-block text-xs px-2 py-0.5 rounded bg-green-50 text-green-700 border border-green-200"
                            } else {
                                "inline-block text-xs px-2 py-0.5 rounded bg-yellow-50 text-yellow-700 border border-yellow-200"
                            };
                            rsx! {
                                div { class: "flex items-center justify-between mb-2",
                                    span { class: "text-sm truncate mr-3", "{excerpt.title}" }
                                    span { class: badge, "{excerpt.status}" }
                                }
                            }
                        }
                    }
                }

                div { class: "bg-white border border-gray-200 rounded-lg p-6 mb-4",
                    h2 { class: "text-lg font-medium mb-3", "Generated brief" }
                    div { class: "prose prose-sm max-w-none text-gray-800",
                        dangerous_inner_html: "{brief_html}"
                    }
                }

                form { method: "POST", action: "/download",
                    input { r#type: "hidden", name: "filename", value: "{filename}" }
                    input { r#type: "hidden", name: "body", value: "{brief_markdown}" }
                    button {
                        r#type: "submit",
                        class: "w-full py-2.5 bg-blue-600 text-white rounded text-sm font-medium cursor-pointer hover:bg-blue-800",
                        "Download Markdown"
                    }
                }
            }
        }
    }
}

// --- Render entry points ---

pub fn render_form(error: Option<String>) -> String {
    let mut dom = VirtualDom::new_with_props(QueryForm, QueryFormProps { error });
    dom.rebuild_in_place();
    render_to_html(&dom)
}

pub fn render_results(
    keyword: String,
    results: Vec<ResultView>,
    excerpts: Vec<ExcerptView>,
    brief_markdown: String,
    filename: String,
) -> String {
    let brief_html = crate::templates::render_markdown_html(&brief_markdown);
    let mut dom = VirtualDom::new_with_props(
        ResultsPage,
        ResultsPageProps {
            keyword,
            results,
            excerpts,
            brief_markdown,
            brief_html,
            filename,
        },
    );
    dom.rebuild_in_place();
    render_to_html(&dom)
}
