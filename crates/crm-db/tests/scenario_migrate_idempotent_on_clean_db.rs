/// Migrating twice must be idempotent, and both tables must exist afterwards.
///
/// DB-backed test, skipped if CRM_DATABASE_URL is not set.
#[tokio::test]
async fn migrate_idempotent_on_clean_db() -> anyhow::Result<()> {
    let url = match std::env::var(crm_db::ENV_DB_URL) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("SKIP: CRM_DATABASE_URL not set");
            return Ok(());
        }
    };

    let pool = crm_db::connect(&url, 2).await?;

    crm_db::migrate(&pool).await?;
    crm_db::migrate(&pool).await?;

    let st = crm_db::status(&pool).await?;
    assert!(st.ok);
    assert!(st.has_customers_table);
    assert!(st.has_orders_table);

    Ok(())
}
