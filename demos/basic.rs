use resilient_http::{ApiClient, ErrorKind, QueryParams, RequestSpec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct Item {
    id: u64,
    name: String,
}

#[derive(Serialize)]
struct NewItem<'a> {
    name: &'a str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // API_BASE_URL=https://api.example.com API_VERSION=/v1 cargo run --example basic
    let api = ApiClient::from_env().map_err(anyhow::Error::msg)?;

    api.session_hook()
        .set(|| eprintln!("session expired, please sign in again"));

    let query = QueryParams::new()
        .with("q", "kit")
        .with_opt("page", None::<i64>)
        .with("limit", 10);
    let items = api.get_with_query::<Vec<Item>, _>("/items", query).await?;
    for item in items.into_data().unwrap_or_default() {
        println!("{} {}", item.id, item.name);
    }

    let created = api
        .send::<Item>(RequestSpec::post("/items").json(&NewItem { name: "Kit" })?)
        .await;
    match created {
        Ok(response) => println!("created: {:?}", response.data),
        Err(err) if err.kind() == ErrorKind::Unauthorized => {
            eprintln!("not signed in: {err}");
        }
        Err(err) => return Err(err.into()),
    }

    api.session_hook().clear();
    Ok(())
}
