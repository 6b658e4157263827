//! End-to-end tests driving the router in-process.

use std::io::Cursor;

use axum::http::{Method, StatusCode};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use serde_json::json;

mod common;
use common::*;

#[cfg(test)]
mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let app = setup_test_app().await;
        let (status, body) = app.send(Method::GET, "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "db": true}));
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let app = setup_test_app().await;

        let (status, body) = app
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({"phone": "  admin ", "password": "admin123"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["phone"], "admin");
        assert_eq!(body["user"]["role"], "owner");

        let token = body["token"].as_str().unwrap();
        let (status, me) = app.get("/auth/me", token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["phone"], "admin");
        assert_eq!(me["id"], body["user"]["id"]);
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let app = setup_test_app().await;

        for body in [
            json!({"phone": "admin", "password": "wrong"}),
            json!({"phone": "nobody", "password": "admin123"}),
            json!({}),
        ] {
            let (status, error) = app.send(Method::POST, "/auth/login", None, Some(body)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(error["code"], "INVALID_CREDENTIALS");
            assert_eq!(error["error"], "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = setup_test_app().await;

        for uri in ["/auth/me", "/owner", "/products", "/reports/summary", "/billing/sale/1"] {
            let (status, error) = app.send(Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(error["code"], "UNAUTHORIZED");
        }

        let (status, _) = app.get("/products", "not.a.token").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[cfg(test)]
mod product_tests {
    use super::*;

    #[tokio::test]
    async fn test_product_crud() {
        let app = setup_test_app().await;
        let token = app.login().await;

        let (status, created) = app
            .post(
                "/products",
                &token,
                json!({"name": " Parle-G ", "category": "Biscuits", "price": "10", "stock": 40, "gstRate": 0.12}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["name"], "Parle-G");
        assert_eq!(created["price"], 10.0);
        assert_eq!(created["gstRate"], 0.12);
        let id = created["id"].as_i64().unwrap();

        app.create_product(&token, json!({"name": "Tata Tea", "category": "Beverages", "price": 45}))
            .await;

        let (_, all) = app.get("/products", &token).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(all[0]["name"], "Tata Tea");
        assert_eq!(all[0]["stock"], 0);
        assert_eq!(all[0]["gstRate"], serde_json::Value::Null);

        let (_, found) = app.get("/products?q=BISC", &token).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["id"], id);

        let (status, updated) = app
            .put(&format!("/products/{}", id), &token, json!({"price": 12.5, "gstRate": ""}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["price"], 12.5);
        assert_eq!(updated["gstRate"], serde_json::Value::Null);
        assert_eq!(updated["name"], "Parle-G");

        let (status, body) = app.delete(&format!("/products/{}", id), &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));

        let (status, error) = app.delete(&format!("/products/{}", id), &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error["code"], "NOT_FOUND");

        let (status, _) = app.put("/products/999", &token, json!({"stock": 1})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_product_validation() {
        let app = setup_test_app().await;
        let token = app.login().await;

        let (status, error) = app
            .post("/products", &token, json!({"name": "   ", "category": "Snacks", "price": 5}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "VALIDATION_ERROR");

        let (status, _) = app
            .post("/products", &token, json!({"name": "Chips", "category": "Snacks", "price": "abc"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, error) = app
            .send(Method::POST, "/products", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "INVALID_BODY");
    }
}

#[cfg(test)]
mod billing_tests {
    use super::*;

    #[tokio::test]
    async fn test_sale_flow() {
        let app = setup_test_app().await;
        let token = app.login().await;
        let tea = app
            .create_product(&token, json!({"name": "Tea", "category": "Beverages", "price": 45, "stock": 10}))
            .await;

        let (status, receipt) = app
            .post(
                "/billing/sale",
                &token,
                json!({"lines": [{"productId": tea, "qty": 2}], "paymentMode": "cash"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", receipt);
        assert_eq!(receipt["invoiceNo"], "INV-00001");
        assert_eq!(receipt["paymentMode"], "CASH");
        assert_eq!(receipt["totals"], json!({"subTotal": 90.0, "gst": 16.2, "grandTotal": 106.2}));
        assert_eq!(receipt["items"][0]["gstRate"], 0.18);

        let (_, products) = app.get("/products", &token).await;
        assert_eq!(products[0]["stock"], 8);

        let (status, second) = app
            .post("/billing/sale", &token, json!({"lines": [{"productId": tea}], "paymentMode": "UPI"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["invoiceNo"], "INV-00002");

        let id = receipt["id"].as_i64().unwrap();
        let (status, reprint) = app.get(&format!("/billing/sale/{}", id), &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reprint["invoiceNo"], "INV-00001");
        assert_eq!(reprint["items"][0]["name"], "Tea");

        let (status, _) = app.get("/billing/sale/999", &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sale_rejections() {
        let app = setup_test_app().await;
        let token = app.login().await;
        let tea = app
            .create_product(&token, json!({"name": "Tea", "category": "Beverages", "price": 45, "stock": 3}))
            .await;

        let cases = [
            (json!({"lines": []}), StatusCode::BAD_REQUEST, "EMPTY_ORDER"),
            (json!({"lines": [{"productId": 999}]}), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (json!({"lines": [{"productId": tea, "qty": 0}]}), StatusCode::BAD_REQUEST, "INVALID_QUANTITY"),
            (
                json!({"lines": [{"productId": tea, "qty": 2}, {"productId": tea, "qty": 2}]}),
                StatusCode::BAD_REQUEST,
                "INSUFFICIENT_STOCK",
            ),
            (
                json!({"lines": [{"productId": tea}], "paymentMode": "CARD"}),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
        ];

        for (body, expected_status, expected_code) in cases {
            let (status, error) = app.post("/billing/sale", &token, body).await;
            assert_eq!(status, expected_status);
            assert_eq!(error["code"], expected_code);
        }

        // Nothing was written
        let (_, products) = app.get("/products", &token).await;
        assert_eq!(products[0]["stock"], 3);
        assert_eq!(app.state.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_oversized_sale_is_rejected() {
        let app = setup_test_app().await;
        let token = app.login().await;
        let gold = app
            .create_product(&token, json!({"name": "Gold Bar", "category": "Bullion", "price": 1e15, "stock": 1000}))
            .await;

        let (status, error) = app
            .post("/billing/sale", &token, json!({"lines": [{"productId": gold, "qty": 100}]}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "VALIDATION_ERROR");
        assert_eq!(error["error"], "amount too large");

        let (status, error) = app
            .post("/products", &token, json!({"name": "Ledger", "category": "Misc", "price": 1, "stock": 1e19}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "VALIDATION_ERROR");

        let (_, products) = app.get("/products", &token).await;
        assert_eq!(products[0]["stock"], 1000);
        assert_eq!(app.state.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_during_sale() {
        let app = setup_test_app().await;
        let token = app.login().await;
        let tea = app
            .create_product(&token, json!({"name": "Tea", "category": "Beverages", "price": 45, "stock": 10}))
            .await;

        sqlx::query(
            "CREATE TRIGGER reject_sale_items BEFORE INSERT ON sale_items \
             BEGIN SELECT RAISE(ABORT, 'sale_items unavailable'); END",
        )
        .execute(app.state.db.pool())
        .await
        .unwrap();

        let (status, error) = app
            .post("/billing/sale", &token, json!({"lines": [{"productId": tea, "qty": 2}]}))
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error, json!({"error": "Internal server error", "code": "PERSISTENCE_ERROR"}));

        let (_, products) = app.get("/products", &token).await;
        assert_eq!(products[0]["stock"], 10);
        assert_eq!(app.state.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upi_qr() {
        let app = setup_test_app().await;
        let token = app.login().await;

        let (status, error) = app.post("/billing/upi-qr", &token, json!({"amount": 100.5})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "PAYMENT_ADDRESS_NOT_CONFIGURED");

        let (status, ok) = app
            .put("/owner", &token, json!({"shopName": "My Shop", "upiVpa": "shop@upi"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ok, json!({"ok": true}));

        let (status, qr) = app
            .post("/billing/upi-qr", &token, json!({"amount": 100.5, "note": "Order INV-00007"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            qr["intent"],
            "upi://pay?pa=shop%40upi&pn=My+Shop&am=100.50&cu=INR&tn=Order+INV-00007"
        );
        assert!(qr["qrDataUrl"].as_str().unwrap().starts_with("data:image/png;base64,"));

        let (status, error) = app.post("/billing/upi-qr", &token, json!({"amount": 0})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "INVALID_AMOUNT");
    }
}

#[cfg(test)]
mod owner_tests {
    use super::*;

    #[tokio::test]
    async fn test_owner_profile_update() {
        let app = setup_test_app().await;
        let token = app.login().await;

        let (status, owner) = app.get("/owner", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(owner["defaultGstRate"], 0.18);

        app.put("/owner", &token, json!({"gstNumber": "27ABCDE1234F1Z5", "defaultGstRate": "0.05"}))
            .await;
        // Unparsable rate is ignored, other fields still apply
        app.put("/owner", &token, json!({"phone": "9876543210", "defaultGstRate": "abc"}))
            .await;

        let (_, owner) = app.get("/owner", &token).await;
        assert_eq!(owner["gstNumber"], "27ABCDE1234F1Z5");
        assert_eq!(owner["phone"], "9876543210");
        assert_eq!(owner["defaultGstRate"], 0.05);

        // New default applies to products without their own rate
        let tea = app
            .create_product(&token, json!({"name": "Tea", "category": "Beverages", "price": 100, "stock": 5}))
            .await;
        let (_, receipt) = app
            .post("/billing/sale", &token, json!({"lines": [{"productId": tea}]}))
            .await;
        assert_eq!(receipt["totals"]["gst"], 5.0);
    }
}

#[cfg(test)]
mod report_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_summary() {
        let app = setup_test_app().await;
        let token = app.login().await;

        let (status, summary) = app.get("/reports/summary", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["total"], 0.0);
        assert_eq!(summary["items"], 0);
        assert_eq!(summary["gst"], 0.0);
        assert_eq!(summary["trend"].as_array().unwrap().len(), 7);
        assert_eq!(summary["today"], json!({"total": 0.0, "items": 0, "gst": 0.0}));
    }

    #[tokio::test]
    async fn test_summary_and_exports_after_sale() {
        let app = setup_test_app().await;
        let token = app.login().await;
        let tea = app
            .create_product(&token, json!({"name": "Tea", "category": "Beverages", "price": 45, "stock": 10}))
            .await;
        app.post("/billing/sale", &token, json!({"lines": [{"productId": tea, "qty": 2}]}))
            .await;

        let (_, summary) = app.get("/reports/summary?range=WEEKLY", &token).await;
        assert_eq!(summary["total"], 106.2);
        assert_eq!(summary["items"], 2);
        assert_eq!(summary["today"]["total"], 106.2);
        assert_eq!(summary["trend"][6]["total"], 106.2);

        let csv = app
            .send_raw(Method::GET, "/reports/csv?range=daily", Some(&token), None)
            .await;
        assert_eq!(csv.status, StatusCode::OK);
        assert_eq!(csv.content_type, "text/csv; charset=utf-8");
        assert_eq!(csv.disposition, "attachment; filename=\"sales_daily.csv\"");
        let text = String::from_utf8(csv.body).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Invoice,Date,Item,Qty,Price,GST%,Line Total,Payment");
        assert!(lines[1].starts_with("INV-00001,"));
        assert!(lines[1].ends_with(",Tea,2,45.0,18%,106.2,CASH"));

        let xlsx = app
            .send_raw(Method::GET, "/reports/excel?range=all", Some(&token), None)
            .await;
        assert_eq!(xlsx.status, StatusCode::OK);
        assert_eq!(xlsx.disposition, "attachment; filename=\"sales_all.xlsx\"");
        assert!(xlsx.body.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_csv_and_excel_exports_agree() {
        let app = setup_test_app().await;
        let token = app.login().await;
        let tea = app
            .create_product(&token, json!({"name": "Tea", "category": "Beverages", "price": 45, "stock": 10}))
            .await;
        let biscuits = app
            .create_product(
                &token,
                json!({"name": "Parle-G, 100g", "category": "Snacks", "price": "10.5", "stock": 20, "gstRate": 0.05}),
            )
            .await;
        app.post("/billing/sale", &token, json!({"lines": [{"productId": tea, "qty": 2}]}))
            .await;
        app.post(
            "/billing/sale",
            &token,
            json!({"lines": [{"productId": biscuits, "qty": 3}, {"productId": tea, "price": 40}], "paymentMode": "UPI"}),
        )
        .await;

        for range in ["daily", "weekly", "monthly", "all"] {
            let csv = app
                .send_raw(Method::GET, &format!("/reports/csv?range={}", range), Some(&token), None)
                .await;
            let xlsx = app
                .send_raw(Method::GET, &format!("/reports/excel?range={}", range), Some(&token), None)
                .await;
            assert_eq!(csv.status, StatusCode::OK);
            assert_eq!(xlsx.status, StatusCode::OK);

            let records: Vec<csv::StringRecord> = csv::ReaderBuilder::new()
                .has_headers(false)
                .from_reader(csv.body.as_slice())
                .records()
                .collect::<Result<_, _>>()
                .unwrap();
            assert_eq!(records.len(), 4, "header plus three lines for {}", range);

            let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(xlsx.body)).unwrap();
            let sheet = workbook.worksheet_range("Sales").unwrap();
            assert_eq!(sheet.height(), records.len());

            for (cells, record) in sheet.rows().zip(&records) {
                assert_eq!(cells.len(), record.len());
                for (cell, field) in cells.iter().zip(record.iter()) {
                    match cell {
                        Data::String(text) => assert_eq!(text, field),
                        Data::Float(number) => assert_eq!(field.parse::<f64>().unwrap(), *number),
                        other => panic!("unexpected cell {:?} for {:?}", other, field),
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_range_rejected() {
        let app = setup_test_app().await;
        let token = app.login().await;

        let (status, error) = app.get("/reports/summary?range=yearly", &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "VALIDATION_ERROR");

        let csv = app
            .send_raw(Method::GET, "/reports/csv?range=yearly", Some(&token), None)
            .await;
        assert_eq!(csv.status, StatusCode::BAD_REQUEST);
    }
}
