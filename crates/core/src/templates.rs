//! Embedded templates for the generated application
//!
//! This module owns the template content that the scaffolder materializes:
//! view templates per engine, stylesheets per CSS preprocessor, the server
//! entry point, routes, and the Express application module. Templates that
//! depend on the selected options (view engine, CSS middleware, ES5 mode)
//! are assembled programmatically rather than through a template language,
//! since the conditional structure is small and fixed.

use crate::errors::TemplateError;
use std::fmt;
use std::str::FromStr;

/// Title rendered by the generated application's index route and views.
pub const APP_TITLE: &str = "Stencil";

/// Supported view engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEngine {
    Dust,
    Ejs,
    Hbs,
    Hjs,
    Jade,
    Pug,
    Twig,
    Vash,
}

impl ViewEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewEngine::Dust => "dust",
            ViewEngine::Ejs => "ejs",
            ViewEngine::Hbs => "hbs",
            ViewEngine::Hjs => "hjs",
            ViewEngine::Jade => "jade",
            ViewEngine::Pug => "pug",
            ViewEngine::Twig => "twig",
            ViewEngine::Vash => "vash",
        }
    }

    /// View files for this engine as (filename, content) pairs
    ///
    /// Engines without layout support produce two files; the rest produce
    /// three (layout, index, error). The scaffolder relies on this count
    /// for its created-entry report.
    pub fn view_files(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            ViewEngine::Dust => vec![("error.dust", ERROR_DUST), ("index.dust", INDEX_DUST)],
            ViewEngine::Ejs => vec![("error.ejs", ERROR_EJS), ("index.ejs", INDEX_EJS)],
            ViewEngine::Hbs => vec![
                ("error.hbs", ERROR_HBS),
                ("index.hbs", INDEX_HBS),
                ("layout.hbs", LAYOUT_HBS),
            ],
            ViewEngine::Hjs => vec![("error.hjs", ERROR_HJS), ("index.hjs", INDEX_HJS)],
            ViewEngine::Jade => vec![
                ("error.jade", ERROR_JADE),
                ("index.jade", INDEX_JADE),
                ("layout.jade", LAYOUT_JADE),
            ],
            ViewEngine::Pug => vec![
                ("error.pug", ERROR_JADE),
                ("index.pug", INDEX_JADE),
                ("layout.pug", LAYOUT_JADE),
            ],
            ViewEngine::Twig => vec![
                ("error.twig", ERROR_TWIG),
                ("index.twig", INDEX_TWIG),
                ("layout.twig", LAYOUT_TWIG),
            ],
            ViewEngine::Vash => vec![
                ("error.vash", ERROR_VASH),
                ("index.vash", INDEX_VASH),
                ("layout.vash", LAYOUT_VASH),
            ],
        }
    }

    /// npm packages required by this engine as (name, version) pairs
    pub fn dependencies(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            ViewEngine::Dust => vec![("adaro", "~1.0.4"), ("dustjs-linkedin", "~2.5.2")],
            ViewEngine::Ejs => vec![("ejs", "~2.6.1")],
            ViewEngine::Hbs => vec![("hbs", "~4.0.4")],
            ViewEngine::Hjs => vec![("hjs", "~0.0.6")],
            ViewEngine::Jade => vec![("jade", "~1.11.0")],
            ViewEngine::Pug => vec![("pug", "2.0.0-beta11")],
            ViewEngine::Twig => vec![("twig", "~0.10.3")],
            ViewEngine::Vash => vec![("vash", "~0.12.6")],
        }
    }
}

impl fmt::Display for ViewEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewEngine {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dust" => Ok(ViewEngine::Dust),
            "ejs" => Ok(ViewEngine::Ejs),
            "hbs" => Ok(ViewEngine::Hbs),
            "hjs" => Ok(ViewEngine::Hjs),
            "jade" => Ok(ViewEngine::Jade),
            "pug" => Ok(ViewEngine::Pug),
            "twig" => Ok(ViewEngine::Twig),
            "vash" => Ok(ViewEngine::Vash),
            other => Err(TemplateError::UnknownEngine {
                engine: other.to_string(),
            }),
        }
    }
}

/// Supported CSS preprocessors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CssEngine {
    /// Plain CSS, no preprocessor
    #[default]
    Plain,
    Less,
    Sass,
    Stylus,
}

impl CssEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            CssEngine::Plain => "css",
            CssEngine::Less => "less",
            CssEngine::Sass => "sass",
            CssEngine::Stylus => "stylus",
        }
    }

    /// The stylesheet written under public/stylesheets as (filename, content)
    pub fn stylesheet(&self) -> (&'static str, &'static str) {
        match self {
            CssEngine::Plain => ("style.css", STYLE_CSS),
            CssEngine::Less => ("style.less", STYLE_CSS),
            CssEngine::Sass => ("style.sass", STYLE_INDENTED),
            CssEngine::Stylus => ("style.styl", STYLE_INDENTED),
        }
    }

    /// npm packages required to compile this stylesheet at request time
    pub fn dependencies(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            CssEngine::Plain => vec![],
            CssEngine::Less => vec![("less-middleware", "~2.2.1")],
            CssEngine::Sass => vec![("node-sass-middleware", "0.11.0")],
            CssEngine::Stylus => vec![("stylus", "0.54.5")],
        }
    }

    /// Middleware wiring line(s) for app.js, or None for plain CSS
    fn middleware(&self, es5: bool) -> Option<String> {
        let decl = decl(es5);
        match self {
            CssEngine::Plain => None,
            CssEngine::Less => Some(
                "app.use(require('less-middleware')(path.join(__dirname, 'public')));".to_string(),
            ),
            CssEngine::Sass => Some(format!(
                "{decl} sassMiddleware = require('node-sass-middleware');\n\
                 app.use(sassMiddleware({{\n  \
                 src: path.join(__dirname, 'public'),\n  \
                 dest: path.join(__dirname, 'public'),\n  \
                 indentedSyntax: true, // true = .sass and false = .scss\n  \
                 sourceMap: true\n}}));"
            )),
            CssEngine::Stylus => Some(
                "app.use(require('stylus').middleware(path.join(__dirname, 'public')));"
                    .to_string(),
            ),
        }
    }
}

impl FromStr for CssEngine {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "css" => Ok(CssEngine::Plain),
            "less" => Ok(CssEngine::Less),
            "sass" => Ok(CssEngine::Sass),
            "stylus" => Ok(CssEngine::Stylus),
            other => Err(TemplateError::UnknownEngine {
                engine: other.to_string(),
            }),
        }
    }
}

fn decl(es5: bool) -> &'static str {
    if es5 {
        "var"
    } else {
        "const"
    }
}

/// The server entry point written to bin/www
///
/// Reads the port from the PORT environment variable (default 3000) and
/// prints a `Listening on port <n>` line once the socket is bound, so both
/// connection probing and output scanning can detect readiness.
pub fn www_js(app_name: &str, es5: bool) -> String {
    let decl = decl(es5);
    // Named function declarations in both modes: the listeners are attached
    // before the definitions appear, which requires hoisting.
    format!(
        r#"#!/usr/bin/env node

/**
 * Module dependencies.
 */

{decl} app = require('../app');
{decl} debug = require('debug')('{app_name}:server');
{decl} http = require('http');

/**
 * Get port from environment and store in Express.
 */

{decl} port = parseInt(process.env.PORT, 10) || 3000;
app.set('port', port);

/**
 * Create HTTP server and listen on provided port.
 */

{decl} server = http.createServer(app);

server.listen(port);
server.on('error', onError);
server.on('listening', onListening);

/**
 * Event listener for HTTP server "error" event.
 */

function onError(error) {{
  if (error.syscall !== 'listen') {{
    throw error;
  }}

  switch (error.code) {{
    case 'EACCES':
      console.error('Port ' + port + ' requires elevated privileges');
      process.exit(1);
      break;
    case 'EADDRINUSE':
      console.error('Port ' + port + ' is already in use');
      process.exit(1);
      break;
    default:
      throw error;
  }}
}}

/**
 * Event listener for HTTP server "listening" event.
 */

function onListening() {{
  {decl} addr = server.address();
  console.log('Listening on port ' + addr.port);
  debug('Listening on port ' + addr.port);
}}
"#
    )
}

/// The Express application module written to app.js
pub fn app_js(view: Option<ViewEngine>, css: CssEngine, es5: bool) -> String {
    let decl = decl(es5);
    let handler = |args: &str| {
        if es5 {
            format!("function({args}) {{")
        } else {
            format!("({args}) => {{")
        }
    };

    let mut out = String::new();

    if view.is_some() {
        out.push_str(&format!("{decl} createError = require('http-errors');\n"));
    }
    out.push_str(&format!("{decl} express = require('express');\n"));
    out.push_str(&format!("{decl} path = require('path');\n"));
    out.push_str(&format!("{decl} cookieParser = require('cookie-parser');\n"));
    out.push_str(&format!("{decl} logger = require('morgan');\n"));
    if view == Some(ViewEngine::Dust) {
        out.push_str(&format!("{decl} adaro = require('adaro');\n"));
    }
    out.push('\n');
    out.push_str(&format!(
        "{decl} indexRouter = require('./routes/index');\n"
    ));
    out.push_str(&format!(
        "{decl} usersRouter = require('./routes/users');\n"
    ));
    out.push('\n');
    out.push_str(&format!("{decl} app = express();\n"));
    out.push('\n');

    if let Some(engine) = view {
        out.push_str("// view engine setup\n");
        out.push_str("app.set('views', path.join(__dirname, 'views'));\n");
        if engine == ViewEngine::Dust {
            out.push_str("app.engine('dust', adaro.dust());\n");
        }
        out.push_str(&format!("app.set('view engine', '{}');\n", engine.as_str()));
        out.push('\n');
    }

    out.push_str("app.use(logger('dev'));\n");
    out.push_str("app.use(express.json());\n");
    out.push_str("app.use(express.urlencoded({ extended: false }));\n");
    out.push_str("app.use(cookieParser());\n");
    if let Some(middleware) = css.middleware(es5) {
        out.push_str(&middleware);
        out.push('\n');
    }
    out.push_str("app.use(express.static(path.join(__dirname, 'public')));\n");
    out.push('\n');
    out.push_str("app.use('/', indexRouter);\n");
    out.push_str("app.use('/users', usersRouter);\n");

    // Without a view engine there is nothing to render an error page with,
    // so the Express defaults handle 404s and errors.
    if view.is_some() {
        out.push('\n');
        out.push_str("// catch 404 and forward to error handler\n");
        out.push_str(&format!("app.use({}\n", handler("req, res, next")));
        out.push_str("  next(createError(404, 'Not Found'));\n");
        out.push_str("});\n");
        out.push('\n');
        out.push_str("// error handler\n");
        out.push_str(&format!("app.use({}\n", handler("err, req, res, next")));
        out.push_str("  // set locals, only providing error in development\n");
        out.push_str("  res.locals.message = err.message;\n");
        out.push_str("  res.locals.error = req.app.get('env') === 'development' ? err : {};\n");
        out.push('\n');
        out.push_str("  // render the error page\n");
        out.push_str("  res.status(err.status || 500);\n");
        out.push_str("  res.render('error');\n");
        out.push_str("});\n");
    }

    out.push('\n');
    out.push_str("module.exports = app;\n");
    out
}

/// The index route module written to routes/index.js
pub fn routes_index_js(view: Option<ViewEngine>, es5: bool) -> String {
    let decl = decl(es5);
    let handler = if es5 {
        "function(req, res, next) {"
    } else {
        "(req, res, next) => {"
    };
    let body = if view.is_some() {
        format!("  res.render('index', {{ title: '{APP_TITLE}' }});")
    } else {
        // Static public/index.html serves the root; keep the route for
        // anything that bypasses the static middleware.
        format!("  res.send('{APP_TITLE}');")
    };

    format!(
        "{decl} express = require('express');\n\
         {decl} router = express.Router();\n\
         \n\
         /* GET home page. */\n\
         router.get('/', {handler}\n\
         {body}\n\
         }});\n\
         \n\
         module.exports = router;\n"
    )
}

/// The users route module written to routes/users.js
pub fn routes_users_js(es5: bool) -> String {
    let decl = decl(es5);
    let handler = if es5 {
        "function(req, res, next) {"
    } else {
        "(req, res, next) => {"
    };

    format!(
        "{decl} express = require('express');\n\
         {decl} router = express.Router();\n\
         \n\
         /* GET users listing. */\n\
         router.get('/', {handler}\n  \
         res.send('respond with a resource');\n\
         }});\n\
         \n\
         module.exports = router;\n"
    )
}

pub const GITIGNORE: &str = "\
# dependencies
node_modules/

# logs
npm-debug.log*
yarn-debug.log*
yarn-error.log*

# environment
.env
";

pub const INDEX_HTML: &str = "\
<!DOCTYPE html>
<html>
  <head>
    <title>Stencil</title>
    <link rel=\"stylesheet\" href=\"/stylesheets/style.css\">
  </head>
  <body>
    <h1>Stencil</h1>
    <p>Welcome to Stencil</p>
  </body>
</html>
";

const STYLE_CSS: &str = "\
body {
  padding: 50px;
  font: 14px \"Lucida Grande\", Helvetica, Arial, sans-serif;
}

a {
  color: #00B7FF;
}
";

// Shared by sass and stylus, both of which accept indented syntax.
const STYLE_INDENTED: &str = "\
body
  padding: 50px
  font: 14px \"Lucida Grande\", Helvetica, Arial, sans-serif

a
  color: #00B7FF
";

const LAYOUT_JADE: &str = "\
doctype html
html
  head
    title= title
    link(rel='stylesheet', href='/stylesheets/style.css')
  body
    block content
";

const INDEX_JADE: &str = "\
extends layout

block content
  h1= title
  p Welcome to #{title}
";

const ERROR_JADE: &str = "\
extends layout

block content
  h1= message
  h2= error.status
  pre #{error.stack}
";

const LAYOUT_HBS: &str = "\
<!DOCTYPE html>
<html>
  <head>
    <title>{{title}}</title>
    <link rel='stylesheet' href='/stylesheets/style.css' />
  </head>
  <body>
    {{{body}}}
  </body>
</html>
";

const INDEX_HBS: &str = "\
<h1>{{title}}</h1>
<p>Welcome to {{title}}</p>
";

const ERROR_HBS: &str = "\
<h1>{{message}}</h1>
<h2>{{error.status}}</h2>
<pre>{{error.stack}}</pre>
";

const INDEX_EJS: &str = "\
<!DOCTYPE html>
<html>
  <head>
    <title><%= title %></title>
    <link rel='stylesheet' href='/stylesheets/style.css' />
  </head>
  <body>
    <h1><%= title %></h1>
    <p>Welcome to <%= title %></p>
  </body>
</html>
";

const ERROR_EJS: &str = "\
<!DOCTYPE html>
<html>
  <head>
    <title><%= message %></title>
    <link rel='stylesheet' href='/stylesheets/style.css' />
  </head>
  <body>
    <h1><%= message %></h1>
    <h2><%= error.status %></h2>
    <pre><%= error.stack %></pre>
  </body>
</html>
";

const INDEX_HJS: &str = "\
<!DOCTYPE html>
<html>
  <head>
    <title>{{ title }}</title>
    <link rel='stylesheet' href='/stylesheets/style.css' />
  </head>
  <body>
    <h1>{{ title }}</h1>
    <p>Welcome to {{ title }}</p>
  </body>
</html>
";

const ERROR_HJS: &str = "\
<!DOCTYPE html>
<html>
  <head>
    <title>{{ message }}</title>
    <link rel='stylesheet' href='/stylesheets/style.css' />
  </head>
  <body>
    <h1>{{ message }}</h1>
    <h2>{{ error.status }}</h2>
    <pre>{{ error.stack }}</pre>
  </body>
</html>
";

const INDEX_DUST: &str = "\
<!DOCTYPE html>
<html>
  <head>
    <title>{title}</title>
    <link rel='stylesheet' href='/stylesheets/style.css' />
  </head>
  <body>
    <h1>{title}</h1>
    <p>Welcome to {title}</p>
  </body>
</html>
";

const ERROR_DUST: &str = "\
<!DOCTYPE html>
<html>
  <head>
    <title>{message}</title>
    <link rel='stylesheet' href='/stylesheets/style.css' />
  </head>
  <body>
    <h1>{message}</h1>
    <h2>{error.status}</h2>
    <pre>{error.stack}</pre>
  </body>
</html>
";

const LAYOUT_TWIG: &str = "\
<!DOCTYPE html>
<html>
  <head>
    <title>{{ title }}</title>
    <link rel='stylesheet' href='/stylesheets/style.css' />
  </head>
  <body>
    {% block body %}{% endblock %}
  </body>
</html>
";

const INDEX_TWIG: &str = "\
{% extends 'layout.twig' %}

{% block body %}
  <h1>{{ title }}</h1>
  <p>Welcome to {{ title }}</p>
{% endblock %}
";

const ERROR_TWIG: &str = "\
{% extends 'layout.twig' %}

{% block body %}
  <h1>{{ message }}</h1>
  <h2>{{ error.status }}</h2>
  <pre>{{ error.stack }}</pre>
{% endblock %}
";

const LAYOUT_VASH: &str = "\
<!DOCTYPE html>
<html>
  <head>
    <title>@model.title</title>
    <link rel='stylesheet' href='/stylesheets/style.css' />
  </head>
  <body>
    @html.block('content')
  </body>
</html>
";

const INDEX_VASH: &str = "\
@html.extend('layout', function(model){
  @html.block('content', function(model){
    <h1>@model.title</h1>
    <p>Welcome to @model.title</p>
  })
})
";

const ERROR_VASH: &str = "\
@html.extend('layout', function(model){
  @html.block('content', function(model){
    <h1>@model.message</h1>
    <h2>@model.error.status</h2>
    <pre>@model.error.stack</pre>
  })
})
";
