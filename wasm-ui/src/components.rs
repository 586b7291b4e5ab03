//! UI components for the blog.

use blog_rs::{Article, Body, Comment, CommentDraft, CommentStore, NavLink, meta_line, post_href};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::storage::BrowserStorage;

fn card_html(article: &Article) -> Html {
    html! {
        <div class="col-sm-6 col-lg-4">
            <div class="card h-100 shadow-sm">
                if !article.cover.is_empty() {
                    <img
                        class="card-img-top"
                        src={article.cover.clone()}
                        alt={article.title.clone()}
                        loading="lazy"
                    />
                }
                <div class="card-body d-flex flex-column">
                    <h5 class="card-title">{ &article.title }</h5>
                    <p class="card-text text-muted small mb-2">{ meta_line(article) }</p>
                    <p class="card-text flex-grow-1">{ &article.excerpt }</p>
                    <a class="btn btn-primary mt-auto" href={post_href(&article.slug)}>
                        { "Read more" }
                    </a>
                </div>
            </div>
        </div>
    }
}

/// Filterable card grid plus the full index table.
#[derive(Properties, PartialEq)]
pub struct PostListProps {
    /// Articles passing the current filter.
    pub cards: Vec<Article>,
    /// Every article, for the index table.
    pub all: Vec<Article>,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
    pub query: String,
    pub on_query: Callback<String>,
    pub on_category: Callback<Option<String>>,
}

#[function_component(PostList)]
pub fn post_list(props: &PostListProps) -> Html {
    let on_input = {
        let on_query = props.on_query.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            on_query.emit(target.value());
        })
    };

    let category_button = |label: &str, category: Option<String>| {
        let active = props.selected_category == category;
        let onclick = {
            let on_category = props.on_category.clone();
            let category = category.clone();
            Callback::from(move |_: MouseEvent| on_category.emit(category.clone()))
        };
        html! {
            <button
                type="button"
                class={classes!("btn", "btn-sm", if active { "btn-secondary" } else { "btn-outline-secondary" })}
                data-category={category.unwrap_or_default()}
                {onclick}
            >
                { label.to_string() }
            </button>
        }
    };

    html! {
        <>
            <div class="d-flex flex-wrap gap-2 mb-3">
                <input
                    id="search-input"
                    type="search"
                    class="form-control"
                    placeholder="Search titles and excerpts"
                    value={props.query.clone()}
                    oninput={on_input}
                />
                <div id="category-list" class="btn-group flex-wrap">
                    { category_button("All", None) }
                    { for props.categories.iter().map(|c| category_button(c.as_str(), Some(c.clone()))) }
                </div>
            </div>

            <div class="row g-4">
                if props.cards.is_empty() {
                    <div class="col text-muted">{ "No articles match." }</div>
                }
                { for props.cards.iter().map(card_html) }
            </div>

            <h2 class="h5 mt-5">{ "All articles" }</h2>
            <table id="post-table" class="table table-sm">
                <thead>
                    <tr>
                        <th scope="col">{ "#" }</th>
                        <th scope="col">{ "Title" }</th>
                        <th scope="col">{ "Category" }</th>
                        <th scope="col">{ "Date" }</th>
                    </tr>
                </thead>
                <tbody>
                    { for props.all.iter().enumerate().map(|(i, article)| html! {
                        <tr>
                            <th scope="row">{ (i + 1).to_string() }</th>
                            <td><a href={post_href(&article.slug)}>{ &article.title }</a></td>
                            <td>{ &article.category }</td>
                            <td>{ &article.date }</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </>
    }
}

fn neighbor_link(id: &'static str, arrow_before: bool, link: &Option<NavLink>) -> Html {
    match link {
        Some(link) => html! {
            <a id={id} class="btn btn-outline-primary" href={link.href.clone()}>
                if arrow_before { { "← " } }
                { &link.title }
                if !arrow_before { { " →" } }
            </a>
        },
        None => html! {},
    }
}

/// One article with its neighbours and comments.
#[derive(Properties, PartialEq)]
pub struct PostDetailProps {
    pub article: Article,
    pub meta: String,
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
    pub body: Body,
    pub on_back: Callback<()>,
}

#[function_component(PostDetail)]
pub fn post_detail(props: &PostDetailProps) -> Html {
    let article = &props.article;
    let on_back_click = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| on_back.emit(()))
    };

    let body = match &props.body {
        // Article bodies come from the site's own collection and are trusted.
        Body::Markup(markup) => Html::from_html_unchecked(AttrValue::from(markup.clone())),
        Body::Loading => html! { <p class="text-muted">{ "Loading…" }</p> },
        Body::Failed(message) => html! { <p class="text-danger">{ message }</p> },
        Body::Empty => html! {},
    };

    html! {
        <article>
            <button id="back-to-list" type="button" class="btn btn-link px-0" onclick={on_back_click}>
                { "← Back" }
            </button>
            <h1 id="post-detail-title">{ &article.title }</h1>
            <p id="post-meta" class="text-muted">{ &props.meta }</p>
            if !article.cover.is_empty() {
                <img id="post-cover" class="img-fluid rounded mb-3" src={article.cover.clone()} alt={article.title.clone()} />
            }
            <div id="post-content">{ body }</div>
            <nav class="d-flex justify-content-between my-4">
                <div>{ neighbor_link("prev-post", true, &props.prev) }</div>
                <div>{ neighbor_link("next-post", false, &props.next) }</div>
            </nav>
            <CommentSection key={article.slug.clone()} slug={article.slug.clone()} />
        </article>
    }
}

#[derive(Properties, PartialEq)]
pub struct NotFoundProps {
    pub slug: String,
    pub on_back: Callback<()>,
}

#[function_component(NotFound)]
pub fn not_found(props: &NotFoundProps) -> Html {
    let on_back_click = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| on_back.emit(()))
    };
    html! {
        <article>
            <button id="back-to-list" type="button" class="btn btn-link px-0" onclick={on_back_click}>
                { "← Back" }
            </button>
            <h1 id="post-detail-title">{ "Article not found" }</h1>
            <p class="text-muted">{ format!("There is no article called \"{}\".", props.slug) }</p>
        </article>
    }
}

/// Rendered comments, author and text as plain text.
#[derive(Properties, PartialEq)]
pub struct CommentListProps {
    pub comments: Vec<Comment>,
}

#[function_component(CommentList)]
pub fn comment_list(props: &CommentListProps) -> Html {
    html! {
        <div id="comment-list" class="vstack gap-2 mb-3">
            if props.comments.is_empty() {
                <div class="text-muted">{ "No comments yet. Be the first!" }</div>
            }
            { for props.comments.iter().map(|c| html! {
                <div class="border rounded p-2">
                    <div class="small text-muted">{ c.display_time() }</div>
                    <div>
                        <strong>{ &c.name }</strong>
                        <span class="ms-2">{ &c.text }</span>
                    </div>
                </div>
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct CommentSectionProps {
    pub slug: String,
}

/// Comments for one article. Keyed by slug, so switching articles
/// remounts it with fresh form state.
#[function_component(CommentSection)]
pub fn comment_section(props: &CommentSectionProps) -> Html {
    let store = use_memo((), |_| CommentStore::new(BrowserStorage));
    let comments = {
        let store = store.clone();
        let slug = props.slug.clone();
        use_state(move || store.list_for(&slug))
    };
    let name = use_state(String::new);
    let text = use_state(String::new);
    let error = use_state(|| None::<String>);

    let on_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            name.set(target.value());
        })
    };

    let on_text = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlTextAreaElement = e.target_unchecked_into();
            text.set(target.value());
        })
    };

    let on_submit = {
        let slug = props.slug.clone();
        let comments = comments.clone();
        let name = name.clone();
        let text = text.clone();
        let error = error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let draft = CommentDraft::new((*name).clone(), (*text).clone());
            match store.append(&slug, draft) {
                Ok(_) => {
                    comments.set(store.list_for(&slug));
                    name.set(String::new());
                    text.set(String::new());
                    error.set(None);
                }
                Err(e) => {
                    log::warn!("comment not saved: {e}");
                    error.set(Some(e.to_string()));
                }
            }
        })
    };

    html! {
        <section class="mt-5">
            <h2 class="h4">{ "Comments" }</h2>
            <CommentList comments={(*comments).clone()} />
            <form
                id="comment-form"
                class={classes!(error.is_some().then_some("was-validated"))}
                novalidate=true
                onsubmit={on_submit}
            >
                <input type="hidden" id="comment-slug" value={props.slug.clone()} />
                <div class="mb-2">
                    <input
                        id="comment-name"
                        class="form-control"
                        placeholder="Your name"
                        required=true
                        value={(*name).clone()}
                        oninput={on_name}
                    />
                </div>
                <div class="mb-2">
                    <textarea
                        id="comment-text"
                        class="form-control"
                        rows="3"
                        placeholder="Say something"
                        required=true
                        value={(*text).clone()}
                        oninput={on_text}
                    />
                </div>
                if let Some(message) = &*error {
                    <div class="invalid-feedback d-block">{ message }</div>
                }
                <button type="submit" class="btn btn-primary">{ "Post comment" }</button>
            </form>
        </section>
    }
}

#[function_component(ContactPanel)]
pub fn contact_panel() -> Html {
    html! {
        <div class="py-4">
            <h1>{ "Contact" }</h1>
            <p>
                { "Questions about a post or the course? Leave a comment under the article, \
                   or write to " }
                <a href="mailto:class@example.com">{ "class@example.com" }</a>
                { "." }
            </p>
        </div>
    }
}
