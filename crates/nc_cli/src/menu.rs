use std::io::{self, Write};
use std::sync::Arc;
use tracing::warn;

use nc_core::{Article, ArticleStore, Category, Result, UserProfile, UserStore};
use nc_fetcher::HeadlineSource;
use nc_recommend::{top_n, Recommender};

const TOP_LIST_SIZE: usize = 10;

/// Interactive terminal frontend: account handling, browsing, rating and
/// the recommendation view. All persistence and ranking happens behind the
/// store and recommender handles.
pub struct Menu {
    articles: Arc<dyn ArticleStore>,
    users: Arc<dyn UserStore>,
    fetcher: Arc<dyn HeadlineSource>,
    recommender: Recommender,
    fetch_size: usize,
    /// Articles fully displayed this session; only these can be rated.
    viewed: Vec<Article>,
}

impl Menu {
    pub fn new(
        articles: Arc<dyn ArticleStore>,
        users: Arc<dyn UserStore>,
        fetcher: Arc<dyn HeadlineSource>,
        recommender: Recommender,
        fetch_size: usize,
    ) -> Self {
        Self {
            articles,
            users,
            fetcher,
            recommender,
            fetch_size,
            viewed: Vec::new(),
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        println!("Welcome to NewsCollector!");
        loop {
            println!("\nSelect an option:");
            println!("1. Create an Account");
            println!("2. Login to an Existing Account");
            println!("3. Exit");

            match self.prompt("> ")?.as_str() {
                "1" => self.create_account().await?,
                "2" => self.login().await?,
                "3" => {
                    println!("Thank you for using NewsCollector. Goodbye!");
                    return Ok(());
                }
                _ => println!("Invalid choice. Please try again."),
            }
        }
    }

    async fn create_account(&mut self) -> Result<()> {
        let username = self.prompt("Enter username: ")?;
        let password = self.prompt("Enter password: ")?;

        if self.users.username_exists(&username).await? {
            println!("Username already exists. Please choose a different username.");
            return Ok(());
        }

        let mut user = self.users.create_user(&username, &password).await?;
        println!("Account created successfully!");

        self.refresh_articles().await;
        self.select_preferences(&mut user).await?;
        self.dashboard(&user).await
    }

    async fn login(&mut self) -> Result<()> {
        let username = self.prompt("Enter username: ")?;
        let password = self.prompt("Enter password: ")?;

        match self.users.authenticate(&username, &password).await? {
            Some(user) => {
                println!("Login successful!");
                self.refresh_articles().await;
                self.dashboard(&user).await
            }
            None => {
                println!("Invalid username or password.");
                Ok(())
            }
        }
    }

    /// Pull a fresh mixed batch into the store. A feed outage degrades to
    /// whatever is already stored, it never blocks the session.
    async fn refresh_articles(&self) {
        match self.fetcher.fetch_mixed(self.fetch_size).await {
            Ok(articles) => {
                let mut stored = 0;
                for article in &articles {
                    match self.articles.store_article(article).await {
                        Ok(()) => stored += 1,
                        Err(e) => warn!("failed to store article {}: {e}", article.id),
                    }
                }
                println!("Collected {stored} fresh articles.");
            }
            Err(e) => {
                warn!("failed to fetch headlines: {e}");
                println!("Could not reach the news feed; showing stored articles only.");
            }
        }
    }

    async fn select_preferences(&self, user: &mut UserProfile) -> Result<()> {
        println!("\nSelect your preferences (choose categories):");
        for (i, category) in Category::ALL.iter().enumerate() {
            println!("{}. {category}", i + 1);
        }

        let input = self.prompt("Enter your choices separated by commas (e.g., 1,2,3): ")?;
        let mut preferences = Vec::new();
        for choice in input.split(',') {
            match choice.trim().parse::<usize>() {
                Ok(n) if (1..=Category::ALL.len()).contains(&n) => {
                    preferences.push(Category::ALL[n - 1].to_string());
                }
                _ => println!("Invalid choice: {}", choice.trim()),
            }
        }

        user.preferences = preferences;
        self.users
            .update_preferences(&user.id, &user.preferences)
            .await?;
        println!("Preferences updated successfully!");
        Ok(())
    }

    async fn dashboard(&mut self, user: &UserProfile) -> Result<()> {
        self.viewed.clear();
        loop {
            println!("\nDashboard - Select an option:");
            println!("1. View Recommendations");
            println!("2. Select Category to Read Article");
            println!("3. Rate an Article");
            println!("4. Logout");

            // Store and feed failures are reported here and the session
            // continues; only input stream errors end it.
            match self.prompt("> ")?.as_str() {
                "1" => {
                    if let Err(e) = self.view_recommendations(user).await {
                        println!("Could not load recommendations: {e}");
                    }
                }
                "2" => {
                    if let Err(e) = self.browse_category().await {
                        println!("Could not load articles: {e}");
                    }
                }
                "3" => {
                    if let Err(e) = self.rate_article(user).await {
                        println!("Could not save the rating: {e}");
                    }
                }
                "4" => {
                    println!("Logging out...");
                    return Ok(());
                }
                _ => println!("Invalid choice. Please try again."),
            }
        }
    }

    async fn view_recommendations(&mut self, user: &UserProfile) -> Result<()> {
        let ranked = self.recommender.recommendations(user).await?;
        if ranked.is_empty() {
            println!("No recommendations available at this time.");
            return Ok(());
        }

        let top = top_n(ranked, TOP_LIST_SIZE);
        println!("\nYour Recommendations (showing top {}):", top.len());
        for (i, article) in top.iter().enumerate() {
            println!(
                "{}. {} ({}) [ID: {}]",
                i + 1,
                article.title,
                article.category,
                article.id
            );
        }

        self.pick_and_display(top)
    }

    async fn browse_category(&mut self) -> Result<()> {
        println!("Select a category:");
        for (i, category) in Category::ALL.iter().enumerate() {
            println!("{}. {category}", i + 1);
        }

        let category = match self.prompt("> ")?.parse::<usize>() {
            Ok(n) if (1..=Category::ALL.len()).contains(&n) => Category::ALL[n - 1],
            _ => {
                println!("Invalid choice.");
                return Ok(());
            }
        };

        let articles = self.articles.get_by_category(category.as_str()).await?;
        if articles.is_empty() {
            println!("No articles found in the selected category.");
            return Ok(());
        }

        let listed: Vec<Article> = articles.into_iter().take(TOP_LIST_SIZE).collect();
        println!("Articles in {category}:");
        for (i, article) in listed.iter().enumerate() {
            println!("{}. {} [ID: {}]", i + 1, article.title, article.id);
        }

        self.pick_and_display(listed)
    }

    /// Let the user open one entry of a just-printed list by number. The
    /// opened article joins the session's viewed list.
    fn pick_and_display(&mut self, listed: Vec<Article>) -> Result<()> {
        let input = self.prompt(
            "Enter the number of the article you wish to read, or type 'Exit' to return to the dashboard: ",
        )?;
        if input.eq_ignore_ascii_case("exit") {
            println!("Returning to the dashboard...");
            return Ok(());
        }

        match input.parse::<usize>() {
            Ok(n) if (1..=listed.len()).contains(&n) => {
                let article = listed[n - 1].clone();
                display_full_article(&article);
                self.viewed.push(article);
            }
            _ => println!("Invalid choice. Please try again."),
        }
        Ok(())
    }

    async fn rate_article(&mut self, user: &UserProfile) -> Result<()> {
        if self.viewed.is_empty() {
            println!("No articles have been viewed yet. Please view an article first.");
            return Ok(());
        }

        println!("\nArticles you have viewed:");
        for (i, article) in self.viewed.iter().enumerate() {
            println!("{}. {} [ID: {}]", i + 1, article.title, article.id);
        }

        let article_id = self.prompt("Enter the article ID of the article you want to rate: ")?;
        let rating = self.prompt_int("Enter rating (1-5): ")?;

        if !(1..=5).contains(&rating) {
            println!("Invalid rating. Please enter a value between 1 and 5.");
            return Ok(());
        }

        match self.viewed.iter().find(|a| a.id == article_id) {
            Some(article) => {
                self.users.save_rating(&user.id, &article.id, rating).await?;
                println!("Thank you for rating the article!");
            }
            None => {
                println!("Article not found in viewed articles list. Please check the ID and try again.");
            }
        }
        Ok(())
    }

    fn prompt(&self, message: &str) -> Result<String> {
        print!("{message}");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn prompt_int(&self, message: &str) -> Result<i32> {
        loop {
            match self.prompt(message)?.parse::<i32>() {
                Ok(n) => return Ok(n),
                Err(_) => println!("Invalid input. Please enter a valid number."),
            }
        }
    }
}

fn display_full_article(article: &Article) {
    println!("\n--- Full Article ---");
    println!("Category: {}", article.category);
    println!("Title: {}", article.title);
    println!("Author: {}", article.author_or_unknown());
    println!("Content: {}", article.content);
    println!("Published Date: {}", article.published_at);
    println!("Source: {}", article.source);
    println!("-------------------\n");
}
