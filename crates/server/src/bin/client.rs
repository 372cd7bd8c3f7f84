use reqwest::redirect::Policy;
use serde_json::Value;

const BASE_URL: &str = "http://127.0.0.1:3000";

fn admin_token() -> String {
    std::env::var("CUMMENTS_SECURITY__ADMIN_TOKEN")
        .unwrap_or_else(|_| "admin_secret_change_me".to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 重定向本身就是结果，不要自动跟随
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()?;
    let admin = format!("Bearer {}", admin_token());
    println!("Starting comments test client...");

    println!("\n[1/5] Creating article and user...");
    let article: Value = client
        .post(format!("{}/admin/articles", BASE_URL))
        .header("Authorization", &admin)
        .json(&serde_json::json!({ "title": "Hello comments" }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let article_id = article["id"].as_i64().unwrap_or_default();

    let username = format!("ferris-{:x}", rand_suffix());
    let user: Value = client
        .post(format!("{}/admin/users", BASE_URL))
        .header("Authorization", &admin)
        .json(&serde_json::json!({ "username": username }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let bearer = format!("Bearer {}", user["token"].as_str().unwrap_or_default());
    println!("   -> article {} / user {}", article_id, username);

    println!("\n[2/5] Posting a comment...");
    let resp = client
        .post(format!("{}/add/{}/", BASE_URL, article_id))
        .header("Authorization", &bearer)
        .form(&[("body", "This is a message from the test client!")])
        .send()
        .await?;
    println!("   -> {} Location: {:?}", resp.status(), resp.headers().get("location"));

    let comments: Value = client
        .get(format!("{}/comments/{}/", BASE_URL, article_id))
        .header("Authorization", &bearer)
        .send()
        .await?
        .json()
        .await?;
    let Some(comment_id) = comments[0]["id"].as_i64() else {
        println!("   -> ❌ Comment was not stored: {}", comments);
        return Ok(());
    };

    println!("\n[3/5] Replying to comment {}...", comment_id);
    let resp = client
        .post(format!("{}/reply/{}/", BASE_URL, comment_id))
        .header("Authorization", &bearer)
        .form(&[("body", "And this is a reply.")])
        .send()
        .await?;
    println!("   -> {}", resp.status());

    println!("\n[4/5] Voting...");
    for dir in ["up", "up", "down"] {
        let counts: Value = client
            .post(format!("{}/vote/{}/{}/", BASE_URL, comment_id, dir))
            .header("Authorization", &bearer)
            .send()
            .await?
            .json()
            .await?;
        println!("   -> {}: {}", dir, counts);
    }

    println!("\n[5/5] Fetching replies...");
    let replies: Value = client
        .get(format!("{}/replies/{}/", BASE_URL, comment_id))
        .header("Authorization", &bearer)
        .send()
        .await?
        .json()
        .await?;
    for r in replies.as_array().into_iter().flatten() {
        println!("      - [{}] {}", r["created_at"], r["body"]);
    }

    Ok(())
}

fn rand_suffix() -> u32 {
    rand::random()
}
