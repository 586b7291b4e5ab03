//! Main application component.

use std::rc::Rc;

use blog_rs::{ARTICLES_UNAVAILABLE_MESSAGE, Action, ArticleCache, BlogState, Screen, Section};
use gloo::events::EventListener;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::{ContactPanel, NotFound, PostDetail, PostList};
use crate::fetch::{UI_CONFIG, fetch_articles, fetch_fragment};

/// Application state: the blog state machine behind a Yew reducer.
#[derive(Clone, PartialEq)]
pub struct AppState {
    blog: BlogState,
}

impl Reducible for AppState {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Action) -> Rc<Self> {
        let mut new_state = (*self).clone();
        new_state.blog.apply(action);
        Rc::new(new_state)
    }
}

fn current_fragment() -> String {
    gloo::utils::window().location().hash().unwrap_or_default()
}

/// Go back in history, or to the list when there is nothing to go back to.
fn go_back() {
    let window = gloo::utils::window();
    let went_back = match window.history() {
        Ok(history) if history.length().unwrap_or(0) > 1 => history.back().is_ok(),
        _ => false,
    };
    if !went_back {
        let _ = window.location().set_hash("#/");
    }
}

/// Main application component.
#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer(|| AppState {
        blog: BlogState::new(&current_fragment()),
    });
    let cache = use_memo((), |_| ArticleCache::new());

    // Every fragment change is a new navigation.
    {
        let dispatcher = state.dispatcher();
        use_effect_with((), move |_| {
            let listener = EventListener::new(&gloo::utils::window(), "hashchange", move |_| {
                dispatcher.dispatch(Action::Navigate(current_fragment()));
            });
            move || drop(listener)
        });
    }

    {
        let dispatcher = state.dispatcher();
        let cache = cache.clone();
        use_effect_with(state.blog.needs_articles(), move |needed| {
            if *needed {
                spawn_local(async move {
                    let result = cache.load(|| fetch_articles(UI_CONFIG)).await;
                    dispatcher.dispatch(Action::ArticlesLoaded(result));
                });
            }
        });
    }

    // Completions carry their navigation id; the state drops stale ones.
    {
        let dispatcher = state.dispatcher();
        use_effect_with(state.blog.content_request(), move |request| {
            if let Some(request) = request.clone() {
                spawn_local(async move {
                    let result = fetch_fragment(&request.url).await;
                    dispatcher.dispatch(Action::ContentLoaded {
                        nav: request.nav,
                        slug: request.slug,
                        result,
                    });
                });
            }
        });
    }

    use_effect_with(state.blog.navigation().id, |_| {
        gloo::utils::window().scroll_to_with_x_and_y(0.0, 0.0);
    });

    let on_query = {
        let dispatcher = state.dispatcher();
        Callback::from(move |query: String| dispatcher.dispatch(Action::SetQuery(query)))
    };

    let on_category = {
        let dispatcher = state.dispatcher();
        Callback::from(move |category: Option<String>| {
            dispatcher.dispatch(Action::SelectCategory(category))
        })
    };

    let on_back = Callback::from(|_: ()| go_back());

    let content = match state.blog.screen() {
        Screen::Loading => html! {
            <div class="text-muted py-4">{ "Loading articles…" }</div>
        },
        Screen::Unavailable(_) => html! {
            <div class="alert alert-warning my-4">
                { ARTICLES_UNAVAILABLE_MESSAGE }
            </div>
        },
        Screen::List(list) => html! {
            <PostList
                cards={list.cards.into_iter().cloned().collect::<Vec<_>>()}
                all={list.all.to_vec()}
                categories={list.categories.iter().map(|c| c.to_string()).collect::<Vec<_>>()}
                selected_category={list.selected_category.map(str::to_string)}
                query={state.blog.filter().query().to_string()}
                {on_query}
                {on_category}
            />
        },
        Screen::Detail(detail) => html! {
            <PostDetail
                article={detail.article.clone()}
                meta={detail.meta}
                prev={detail.prev}
                next={detail.next}
                body={detail.body}
                {on_back}
            />
        },
        Screen::NotFound(slug) => html! {
            <NotFound slug={slug.to_string()} {on_back} />
        },
        Screen::Contact => html! { <ContactPanel /> },
    };

    let visible = state.blog.section();

    html! {
        <div class="app">
            <header class="navbar navbar-expand bg-body-tertiary border-bottom mb-4">
                <div class="container">
                    <a class="navbar-brand" href="#/">{ "Class Blog" }</a>
                    <nav class="navbar-nav">
                        <a class={classes!("nav-link", (visible != Section::Contact).then_some("active"))} href="#/">
                            { "Posts" }
                        </a>
                        <a class={classes!("nav-link", (visible == Section::Contact).then_some("active"))} href="#/contact">
                            { "Contact" }
                        </a>
                    </nav>
                </div>
            </header>

            <main class="container">
                { for Section::ALL.iter().map(|&section| html! {
                    <section
                        id={section.element_id()}
                        class={classes!("page-section", (section != visible).then_some("d-none"))}
                    >
                        if section == visible {
                            { content.clone() }
                        }
                    </section>
                }) }
            </main>

            <footer class="container border-top mt-5 py-3 small text-muted">
                { "Student work shared for class. Comments are stored in this browser only." }
            </footer>
        </div>
    }
}
