mod contact;
mod models;
mod post_query;
mod postgres;

pub use self::{
    contact::{ContactStorage, NewSubmission},
    models::{PostDetail, PostSummary, SearchPage, SitemapPost, TaxonomyInfo},
    post_query::PostQuery,
    postgres::{DbPool, init_db_from_env, migrate, new_db_pool},
};
