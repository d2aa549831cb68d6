//! ブログ一覧と記事ページ

use std::fmt;

use leptos::prelude::*;
use ledgerlift_common::format::format_date;
use ledgerlift_common::Route;

use crate::content::{find_post, BLOG_POSTS};
use crate::web::router::Link;

/// 存在しないスラッグ（エラーバウンダリで表示する）
#[derive(Debug, Clone)]
pub struct PostNotFound(pub String);

impl fmt::Display for PostNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No blog post found at \"{}\"", self.0)
    }
}

impl std::error::Error for PostNotFound {}

#[component]
pub fn BlogPage() -> impl IntoView {
    view! {
        <section class="section">
            <h1>"Blog"</h1>
            <div class="post-list">
                {BLOG_POSTS
                    .iter()
                    .map(|post| {
                        view! {
                            <article class="post-summary">
                                <p class="text-muted">{format_date(post.date)}" · "{post.author}</p>
                                <h2>
                                    <Link to=Route::BlogPost(post.slug.to_string()).to_path()>{post.title}</Link>
                                </h2>
                                <p>{post.summary}</p>
                            </article>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
pub fn BlogPostPage(slug: String) -> impl IntoView {
    let post = find_post(&slug).ok_or(PostNotFound(slug));

    post.map(|post| {
        view! {
            <article class="section post">
                <Link to=Route::Blog.to_path() class="nav-link">"← All posts"</Link>
                <h1>{post.title}</h1>
                <p class="text-muted">{format_date(post.date)}" · "{post.author}</p>
                {post.body.iter().map(|p| view! { <p>{*p}</p> }).collect_view()}
            </article>
        }
    })
}
