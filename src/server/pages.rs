//! Static HTML served by the install routes.

/// Form asking the merchant for their shop.
pub const INSTALL_FORM: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Install app</title>
</head>
<body>
  <h1>Connect your Shopify store</h1>
  <form action="/install" method="post">
    <label for="shop">Shop</label>
    <input id="shop" name="shop" type="text" placeholder="your-store.myshopify.com" required>
    <button type="submit">Install</button>
  </form>
</body>
</html>
"#;

/// Page shown after a successful install.
pub const INSTALLED_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>App installed</title>
</head>
<body>
  <h1>App installed</h1>
  <p>Your store is connected. You can close this window.</p>
</body>
</html>
"#;
